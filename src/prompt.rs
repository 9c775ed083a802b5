use std::io::{self, BufRead, Write};

use crate::fuzzy::Candidate;

/// What the resolver needs a person to decide.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub team: String,
    /// Equally plausible built-in matches. Empty when nothing matched.
    pub candidates: Vec<Candidate>,
    /// Set when an earlier answer was rejected.
    pub retry_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    /// Zero-based index into `PromptRequest::candidates`.
    Choose(usize),
    /// A raw hex color, validated by the resolver.
    Color(String),
}

/// Source of answers when resolution cannot decide on its own.
pub trait Prompter {
    fn ask(&mut self, request: &PromptRequest) -> io::Result<PromptAnswer>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, request: &PromptRequest) -> io::Result<PromptAnswer> {
        (**self).ask(request)
    }
}

/// Numbered-menu prompter over any line reader and writer.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, request: &PromptRequest) -> io::Result<PromptAnswer> {
        if let Some(reason) = request.retry_reason.as_deref() {
            writeln!(self.output, "  {reason}")?;
        }

        if request.candidates.is_empty() {
            writeln!(self.output, "\n[!] No color found for: {}", request.team)?;
            loop {
                write!(self.output, "  Enter hex color (e.g. #FF0000): ")?;
                self.output.flush()?;
                let line = self.read_line()?;
                if !line.is_empty() {
                    return Ok(PromptAnswer::Color(line));
                }
            }
        }

        let n = request.candidates.len();
        writeln!(
            self.output,
            "\n[!] Multiple matches found for '{}':",
            request.team
        )?;
        for (i, c) in request.candidates.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, c.name)?;
        }
        writeln!(self.output, "  {}. None of these (enter a hex color)", n + 1)?;

        loop {
            write!(self.output, "Choose (1-{}) or type a hex color: ", n + 1)?;
            self.output.flush()?;
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(idx) if (1..=n).contains(&idx) => return Ok(PromptAnswer::Choose(idx - 1)),
                Ok(idx) if idx == n + 1 => {
                    write!(self.output, "  Enter hex color for {}: ", request.team)?;
                    self.output.flush()?;
                    return Ok(PromptAnswer::Color(self.read_line()?));
                }
                Ok(_) => writeln!(self.output, "Invalid choice, try again.")?,
                Err(_) if line.is_empty() => writeln!(self.output, "Invalid choice, try again.")?,
                Err(_) => return Ok(PromptAnswer::Color(line)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(candidates: &[&str]) -> PromptRequest {
        PromptRequest {
            team: "Man".to_string(),
            candidates: candidates
                .iter()
                .map(|name| Candidate {
                    name: name.to_string(),
                    score: 0.92,
                })
                .collect(),
            retry_reason: None,
        }
    }

    #[test]
    fn picks_numbered_candidate_after_bad_input() {
        let input = b"9\n\n2\n" as &[u8];
        let mut out = Vec::new();
        let mut p = ConsolePrompter::new(input, &mut out);
        let answer = p
            .ask(&request(&["Manchester City", "Manchester United"]))
            .unwrap();
        assert_eq!(answer, PromptAnswer::Choose(1));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2. Manchester United"));
        assert!(text.contains("Invalid choice"));
    }

    #[test]
    fn none_of_these_asks_for_color() {
        let input = b"3\n'#123456'\n" as &[u8];
        let mut out = Vec::new();
        let mut p = ConsolePrompter::new(input, &mut out);
        let answer = p
            .ask(&request(&["Manchester City", "Manchester United"]))
            .unwrap();
        assert_eq!(answer, PromptAnswer::Color("#123456".to_string()));
    }

    #[test]
    fn unmatched_team_reads_color() {
        let input = b"\n00FF00\n" as &[u8];
        let mut out = Vec::new();
        let mut p = ConsolePrompter::new(input, &mut out);
        assert_eq!(
            p.ask(&request(&[])).unwrap(),
            PromptAnswer::Color("00FF00".to_string())
        );
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut out = Vec::new();
        let mut p = ConsolePrompter::new(b"" as &[u8], &mut out);
        let err = p.ask(&request(&[])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
