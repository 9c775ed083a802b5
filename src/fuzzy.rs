use std::cmp::Ordering;
use std::collections::HashMap;

use strsim::{damerau_levenshtein, jaro_winkler};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;
pub const DEFAULT_AMBIGUITY_BAND: f64 = 0.03;

// Structural rules need a few characters before they say anything useful.
const MIN_STRUCTURAL_LEN: usize = 3;

const SCORE_EXACT: f64 = 1.0;
const SCORE_WHOLE_WORD: f64 = 0.92;
const SCORE_TRAILING_WORDS: f64 = 0.90;
const SCORE_PREFIX: f64 = 0.88;
const SCORE_ALL_WORDS: f64 = 0.86;

// Similarity alone must clear this unless the names are one edit apart.
const MIN_SIMILARITY_ONLY: f64 = 0.92;
const MIN_SINGLE_EDIT_LEN: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Minimum score for a candidate to count at all.
    pub threshold: f64,
    /// Candidates this close to the best score make the match ambiguous.
    pub band: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            band: DEFAULT_AMBIGUITY_BAND,
        }
    }
}

/// A team name prepared for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    pub compact: String,
    pub words: Vec<String>,
}

impl MatchKey {
    pub fn new(raw: &str) -> Self {
        let mut folded = String::with_capacity(raw.len());
        for c in raw.chars() {
            match fold_accent(c) {
                Some(f) => folded.push(f),
                None => folded.extend(c.to_lowercase()),
            }
        }
        let words: Vec<String> = folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect();
        let compact = words.concat();
        Self { compact, words }
    }

    pub fn is_empty(&self) -> bool {
        self.compact.is_empty()
    }

    fn len(&self) -> usize {
        self.compact.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyOutcome {
    Single(Candidate),
    /// Ordered by score, then name.
    Ambiguous(Vec<Candidate>),
    NoMatch,
}

/// Lowercases, drops punctuation and whitespace, and folds common accented Latin
/// letters. Letters from other scripts are kept as they are.
pub fn normalize_key(raw: &str) -> String {
    MatchKey::new(raw).compact
}

/// Similarity of `input` to `key` in `0.0..=1.0`.
pub fn score(input: &MatchKey, key: &MatchKey) -> f64 {
    if input.is_empty() || key.is_empty() {
        return 0.0;
    }
    if input.compact == key.compact {
        return SCORE_EXACT;
    }

    let similarity = jaro_winkler(&input.compact, &key.compact);
    let similarity = if similarity >= MIN_SIMILARITY_ONLY || single_edit(input, key) {
        similarity
    } else {
        0.0
    };
    if input.len() < MIN_STRUCTURAL_LEN {
        return similarity;
    }

    let structural = if key.words.iter().any(|w| *w == input.compact) {
        SCORE_WHOLE_WORD
    } else if key.words.ends_with(&input.words) || input.words.ends_with(&key.words) {
        SCORE_TRAILING_WORDS
    } else if key.compact.starts_with(&input.compact)
        || (key.len() > MIN_STRUCTURAL_LEN && input.compact.starts_with(&key.compact))
    {
        SCORE_PREFIX
    } else if input.words.len() > 1
        && input
            .words
            .iter()
            .all(|iw| key.words.iter().any(|kw| kw.starts_with(iw.as_str())))
    {
        SCORE_ALL_WORDS
    } else {
        0.0
    };

    structural.max(similarity)
}

/// Scores `name` against every `(key, canonical)` pair. Several keys may point at the
/// same canonical name; only its best score is kept.
pub fn fuzzy_match<S: AsRef<str>>(
    name: &str,
    keys: &[(MatchKey, S)],
    cfg: MatchConfig,
) -> FuzzyOutcome {
    let input = MatchKey::new(name);
    if input.is_empty() {
        return FuzzyOutcome::NoMatch;
    }

    let mut best: HashMap<&str, f64> = HashMap::new();
    for (key, canonical) in keys {
        let s = score(&input, key);
        if s < cfg.threshold {
            continue;
        }
        let slot = best.entry(canonical.as_ref()).or_insert(0.0);
        if s > *slot {
            *slot = s;
        }
    }

    let mut ranked: Vec<Candidate> = best
        .into_iter()
        .map(|(name, score)| Candidate {
            name: name.to_string(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let Some(top) = ranked.first().map(|c| c.score) else {
        return FuzzyOutcome::NoMatch;
    };
    ranked.retain(|c| top - c.score <= cfg.band);
    if ranked.len() == 1 {
        FuzzyOutcome::Single(ranked.remove(0))
    } else {
        FuzzyOutcome::Ambiguous(ranked)
    }
}

fn single_edit(input: &MatchKey, key: &MatchKey) -> bool {
    input.len() >= MIN_SINGLE_EDIT_LEN && damerau_levenshtein(&input.compact, &key.compact) <= 1
}

fn fold_accent(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        'ß' => 's',
        'İ' | 'ı' => 'i',
        _ => return None,
    };
    Some(folded)
}
