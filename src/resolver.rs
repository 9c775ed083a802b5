use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::color::HexColor;
use crate::config::{DEFAULT_SIMILARITY_THRESHOLD, Settings};
use crate::error::{ColorError, Result};
use crate::fuzzy::{Candidate, FuzzyOutcome, MatchConfig, fuzzy_match, normalize_key};
use crate::prompt::{PromptAnswer, PromptRequest, Prompter};
use crate::store::OverrideStore;
use crate::team_db;

const MAX_PROMPT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    Csv,
    BuiltIn,
    Fuzzy,
    Override,
    Prompt,
}

impl fmt::Display for ColorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColorSource::Csv => "CSV",
            ColorSource::BuiltIn => "database",
            ColorSource::Fuzzy => "fuzzy match",
            ColorSource::Override => "saved",
            ColorSource::Prompt => "prompt",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub color: HexColor,
    pub matched_name: String,
    pub ambiguous_candidates: Vec<String>,
    pub source: ColorSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Resolved(ResolutionResult),
    Ambiguous(Vec<Candidate>),
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorFix {
    pub team: String,
    pub original: HexColor,
    pub replacement: HexColor,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashCheck {
    pub distance: f64,
    pub too_similar: bool,
    /// Alternate kit that separates the sides most, if one improves things.
    pub fix: Option<ColorFix>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    pub home_team: String,
    pub away_team: String,
    pub home: ResolutionResult,
    pub away: ResolutionResult,
    pub home_color: HexColor,
    pub away_color: HexColor,
    pub distance: f64,
    pub fix: Option<ColorFix>,
    /// Colors are still too close; draw one side dashed.
    pub distinct_line_styles: bool,
}

/// Per team, first hit wins: CSV hint, exact built-in name or code, fuzzy built-in
/// match, saved override, then the prompter.
pub struct ColorResolver<'p> {
    store: OverrideStore,
    prompter: Option<Box<dyn Prompter + 'p>>,
    matching: MatchConfig,
    similarity_threshold: f64,
}

impl ColorResolver<'static> {
    pub fn new(store: OverrideStore) -> Self {
        Self {
            store,
            prompter: None,
            matching: MatchConfig::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let store = match settings.store_path.as_ref() {
            Some(path) => OverrideStore::load(path),
            None => OverrideStore::in_memory(),
        };
        Self::new(store)
            .with_matching(settings.matching)
            .with_similarity_threshold(settings.similarity_threshold)
    }
}

impl<'p> ColorResolver<'p> {
    pub fn with_prompter<'q>(self, prompter: impl Prompter + 'q) -> ColorResolver<'q> {
        ColorResolver {
            store: self.store,
            prompter: Some(Box::new(prompter)),
            matching: self.matching,
            similarity_threshold: self.similarity_threshold,
        }
    }

    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.prompter.is_some()
    }

    pub fn store(&self) -> &OverrideStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut OverrideStore {
        &mut self.store
    }

    pub fn into_store(self) -> OverrideStore {
        self.store
    }

    /// Runs every step that needs no user input.
    pub fn lookup(&self, team: &str, hint: Option<&str>) -> Lookup {
        let team = team.trim();

        if let Some(raw) = hint {
            match HexColor::parse(raw) {
                Ok(color) => {
                    debug!("{team}: using CSV color {color}");
                    return Lookup::Resolved(ResolutionResult {
                        color,
                        matched_name: team.to_string(),
                        ambiguous_candidates: Vec::new(),
                        source: ColorSource::Csv,
                    });
                }
                Err(err) => warn!("{team}: ignoring CSV color: {err}"),
            }
        }

        let name = team_db::normalize_team_name(team);
        let canonical: Option<String> = team_db::canonical_name(name)
            .map(str::to_string)
            .or_else(|| {
                self.store
                    .abbrev(name)
                    .map(|full| team_db::canonical_name(full).unwrap_or(full).to_string())
            });

        if let Some(canonical) = canonical.as_deref() {
            if let Some(result) = self.known_team(canonical, ColorSource::BuiltIn, Vec::new()) {
                return Lookup::Resolved(result);
            }
            debug!("{team}: expands to {canonical}, which has no built-in color");
        }
        let search = canonical.as_deref().unwrap_or(name);

        let ambiguous = match fuzzy_match(search, team_db::fuzzy_keys(), self.matching) {
            FuzzyOutcome::Single(hit) => {
                debug!("{team}: fuzzy match {} ({:.3})", hit.name, hit.score);
                if let Some(result) = self.known_team(&hit.name, ColorSource::Fuzzy, Vec::new())
                {
                    return Lookup::Resolved(result);
                }
                None
            }
            FuzzyOutcome::Ambiguous(candidates) => {
                debug!("{team}: {} equally close matches", candidates.len());
                Some(candidates)
            }
            FuzzyOutcome::NoMatch => None,
        };

        for key in [team, search] {
            if let Some((saved_name, color)) = self.store.get(key) {
                return Lookup::Resolved(ResolutionResult {
                    color,
                    matched_name: saved_name.to_string(),
                    ambiguous_candidates: candidate_names(ambiguous.as_deref().unwrap_or(&[])),
                    source: ColorSource::Override,
                });
            }
        }

        if let Some(candidates) = ambiguous {
            return Lookup::Ambiguous(candidates);
        }

        if let FuzzyOutcome::Single(hit) = fuzzy_match(search, &self.store.match_keys(), self.matching)
            && let Some((saved_name, color)) = self.store.get(&hit.name)
        {
            return Lookup::Resolved(ResolutionResult {
                color,
                matched_name: saved_name.to_string(),
                ambiguous_candidates: Vec::new(),
                source: ColorSource::Override,
            });
        }

        Lookup::Unmatched
    }

    pub fn resolve_team(&mut self, team: &str, hint: Option<&str>) -> Result<ResolutionResult> {
        let team = team.trim();
        match self.lookup(team, hint) {
            Lookup::Resolved(result) => Ok(result),
            Lookup::Ambiguous(candidates) => self.prompt_for(team, candidates),
            Lookup::Unmatched => self.prompt_for(team, Vec::new()),
        }
    }

    // Without a prompter every team is tried first, so the error names all of them.
    pub fn resolve_team_colors<S: AsRef<str>>(
        &mut self,
        team_names: &[S],
        csv_hints: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, ResolutionResult>> {
        let mut resolved = BTreeMap::new();
        let mut missing = Vec::new();
        let mut seen = HashSet::new();

        for team in team_names {
            let team = team.as_ref().trim();
            if !seen.insert(team.to_string()) {
                continue;
            }
            let hint = hint_for(csv_hints, team);
            let result = match self.lookup(team, hint) {
                Lookup::Resolved(result) => result,
                Lookup::Ambiguous(_) | Lookup::Unmatched if self.prompter.is_none() => {
                    missing.push(team.to_string());
                    continue;
                }
                Lookup::Ambiguous(candidates) => self.prompt_for(team, candidates)?,
                Lookup::Unmatched => self.prompt_for(team, Vec::new())?,
            };
            info!("{team}: {} [from {}]", result.color, result.source);
            resolved.insert(team.to_string(), result);
        }

        if !missing.is_empty() {
            return Err(ColorError::MissingTeamColor { teams: missing });
        }
        Ok(resolved)
    }

    pub fn check_color_similarity(&self, a: &str, b: &str) -> Result<bool> {
        colors_too_similar(a, b, self.similarity_threshold)
    }

    /// Similar colors only ever produce warnings, never errors.
    pub fn resolve_matchup(
        &mut self,
        home_team: &str,
        away_team: &str,
        csv_hints: &HashMap<String, String>,
    ) -> Result<Matchup> {
        let home_team = home_team.trim();
        let away_team = away_team.trim();
        let mut resolved = self.resolve_team_colors(&[home_team, away_team], csv_hints)?;
        let home = resolved
            .remove(home_team)
            .ok_or_else(|| missing(home_team))?;
        let away = match resolved.remove(away_team) {
            Some(away) => away,
            None if home_team == away_team => home.clone(),
            None => return Err(missing(away_team)),
        };

        let clash = check_clash(
            home_team,
            home.color,
            away_team,
            away.color,
            self.similarity_threshold,
        );
        let (mut home_color, mut away_color) = (home.color, away.color);
        let mut distance = clash.distance;
        let mut distinct_line_styles = false;

        if clash.too_similar {
            warn!(
                "team colors are very similar: {home_team} {} vs {away_team} {} (distance {:.0}, threshold {:.0})",
                home.color, away.color, clash.distance, self.similarity_threshold
            );
            match clash.fix.as_ref() {
                Some(fix) => {
                    info!(
                        "using alternate color for {}: {} -> {}",
                        fix.team, fix.original, fix.replacement
                    );
                    if fix.team == home_team {
                        home_color = fix.replacement;
                    } else {
                        away_color = fix.replacement;
                    }
                    distance = fix.distance;
                    distinct_line_styles = distance < self.similarity_threshold;
                }
                None => {
                    warn!("no alternate colors available, drawing {away_team} dashed");
                    distinct_line_styles = true;
                }
            }
        }

        Ok(Matchup {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home,
            away,
            home_color,
            away_color,
            distance,
            fix: clash.fix,
            distinct_line_styles,
        })
    }

    // A saved override beats the built-in color.
    fn known_team(
        &self,
        canonical: &str,
        builtin_source: ColorSource,
        ambiguous_candidates: Vec<String>,
    ) -> Option<ResolutionResult> {
        if let Some((_, color)) = self.store.get(canonical) {
            return Some(ResolutionResult {
                color,
                matched_name: canonical.to_string(),
                ambiguous_candidates,
                source: ColorSource::Override,
            });
        }
        let (name, color) = team_db::builtin_color(canonical)?;
        Some(ResolutionResult {
            color,
            matched_name: name.to_string(),
            ambiguous_candidates,
            source: builtin_source,
        })
    }

    fn prompt_for(&mut self, team: &str, candidates: Vec<Candidate>) -> Result<ResolutionResult> {
        let names = candidate_names(&candidates);
        let mut request = PromptRequest {
            team: team.to_string(),
            candidates,
            retry_reason: None,
        };
        let mut last_rejected = String::new();

        for _ in 0..MAX_PROMPT_ATTEMPTS {
            let Some(prompter) = self.prompter.as_mut() else {
                return Err(missing(team));
            };
            let answer = prompter.ask(&request).map_err(ColorError::Prompt)?;
            let chosen = match answer {
                PromptAnswer::Choose(idx) => match request.candidates.get(idx) {
                    Some(c) => self
                        .known_team(&c.name, ColorSource::Prompt, names.clone())
                        .map(|r| (r.color, r.matched_name)),
                    None => {
                        last_rejected = format!("choice {}", idx + 1);
                        request.retry_reason = Some(format!("{last_rejected} is not on the list"));
                        None
                    }
                },
                PromptAnswer::Color(raw) => match HexColor::parse(&raw) {
                    Ok(color) => Some((color, team.to_string())),
                    Err(err) => {
                        request.retry_reason = Some(err.to_string());
                        last_rejected = raw;
                        None
                    }
                },
            };

            if let Some((color, matched_name)) = chosen {
                self.store.set(team, color);
                if let Err(err) = self.store.save() {
                    warn!("could not save color for {team}: {err}");
                }
                return Ok(ResolutionResult {
                    color,
                    matched_name,
                    ambiguous_candidates: names,
                    source: ColorSource::Prompt,
                });
            }
        }

        Err(ColorError::InvalidColorFormat(last_rejected))
    }
}

pub fn check_color_similarity(a: &str, b: &str) -> Result<bool> {
    colors_too_similar(a, b, DEFAULT_SIMILARITY_THRESHOLD)
}

/// True when the two colors are closer than `threshold` and hard to tell apart.
pub fn colors_too_similar(a: &str, b: &str, threshold: f64) -> Result<bool> {
    let distance = HexColor::parse(a)?.distance(&HexColor::parse(b)?);
    Ok(distance < threshold)
}

pub fn check_clash(
    home_team: &str,
    home: HexColor,
    away_team: &str,
    away: HexColor,
    threshold: f64,
) -> ClashCheck {
    let distance = home.distance(&away);
    if distance >= threshold {
        return ClashCheck {
            distance,
            too_similar: false,
            fix: None,
        };
    }

    let mut fix: Option<ColorFix> = None;
    let mut best = distance;
    let options = [
        (home_team, home, team_db::alternate_color(home_team), away),
        (away_team, away, team_db::alternate_color(away_team), home),
    ];
    for (team, original, alternate, other) in options {
        let Some(alternate) = alternate else {
            continue;
        };
        let d = alternate.distance(&other);
        if d > best {
            best = d;
            fix = Some(ColorFix {
                team: team.to_string(),
                original,
                replacement: alternate,
                distance: d,
            });
        }
    }

    ClashCheck {
        distance,
        too_similar: true,
        fix,
    }
}

fn hint_for<'a>(hints: &'a HashMap<String, String>, team: &str) -> Option<&'a str> {
    if let Some(hint) = hints.get(team) {
        return Some(hint.as_str());
    }
    let wanted = normalize_key(team);
    hints
        .iter()
        .find(|(name, _)| normalize_key(name) == wanted)
        .map(|(_, hint)| hint.as_str())
}

fn candidate_names(candidates: &[Candidate]) -> Vec<String> {
    candidates.iter().map(|c| c.name.clone()).collect()
}

fn missing(team: &str) -> ColorError {
    ColorError::MissingTeamColor {
        teams: vec![team.to_string()],
    }
}
