use std::env;
use std::path::PathBuf;

use crate::fuzzy::{DEFAULT_AMBIGUITY_BAND, DEFAULT_MATCH_THRESHOLD, MatchConfig};
use crate::store::default_store_path;

/// Two team colors closer than this (RGB distance) are hard to tell apart.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Settings {
    pub store_path: Option<PathBuf>,
    pub matching: MatchConfig,
    pub similarity_threshold: f64,
    pub interactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            matching: MatchConfig::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            interactive: true,
        }
    }
}

impl Settings {
    /// Reads `KIT_COLORS_*` variables. Callers load `.env` files first.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let store_path = lookup("KIT_COLORS_STORE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(default_store_path);
        let threshold = lookup("KIT_COLORS_MATCH_THRESHOLD")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_MATCH_THRESHOLD)
            .clamp(0.5, 1.0);
        let band = lookup("KIT_COLORS_AMBIGUITY_BAND")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_AMBIGUITY_BAND)
            .clamp(0.0, 0.2);
        let similarity_threshold = lookup("KIT_COLORS_SIMILARITY_THRESHOLD")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD)
            .clamp(0.0, 442.0);
        let interactive = lookup("KIT_COLORS_INTERACTIVE")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        Self {
            store_path,
            matching: MatchConfig { threshold, band },
            similarity_threshold,
            interactive,
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
