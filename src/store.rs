use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{ColorError, Result};
use crate::fuzzy::{MatchKey, normalize_key};

const STORE_DIR: &str = "kit_colors";
const STORE_FILE: &str = "team_colors.json";
const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    colors: BTreeMap<String, SavedColor>,
    #[serde(default)]
    abbrevs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedColor {
    pub color: HexColor,
    #[serde(default)]
    pub saved_at: Option<String>,
}

/// User-confirmed team colors and abbreviations, kept in one JSON file.
///
/// The file is read once on load and rewritten whole on every save. Concurrent
/// writers are not coordinated; the last one wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    path: Option<PathBuf>,
    colors: BTreeMap<String, SavedColor>,
    abbrevs: BTreeMap<String, String>,
}

impl OverrideStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads `path`. A missing file gives an empty store; a corrupt or
    /// older-version file is logged and ignored.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoreFile>(&raw) {
                Ok(file) if file.version == STORE_VERSION => file,
                Ok(file) => {
                    warn!(
                        "ignoring override store {} with version {}",
                        path.display(),
                        file.version
                    );
                    StoreFile::default()
                }
                Err(err) => {
                    warn!("ignoring unreadable override store {}: {err}", path.display());
                    StoreFile::default()
                }
            },
            Err(_) => StoreFile::default(),
        };
        debug!(
            "loaded {} saved colors, {} abbreviations from {}",
            file.colors.len(),
            file.abbrevs.len(),
            path.display()
        );
        Self {
            path: Some(path),
            colors: file.colors,
            abbrevs: file.abbrevs,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Saved color for `team`, compared after normalisation.
    pub fn get(&self, team: &str) -> Option<(&str, HexColor)> {
        let wanted = store_key(team);
        if wanted.is_empty() {
            return None;
        }
        self.colors
            .iter()
            .find(|(name, _)| store_key(name) == wanted)
            .map(|(name, saved)| (name.as_str(), saved.color))
    }

    /// Inserts or replaces the color for `team`. Any entry that normalises to the
    /// same key is replaced, keeping names unique.
    pub fn set(&mut self, team: &str, color: HexColor) {
        let team = team.trim();
        let wanted = store_key(team);
        self.colors.retain(|name, _| store_key(name) != wanted);
        self.colors.insert(
            team.to_string(),
            SavedColor {
                color,
                saved_at: Some(Utc::now().to_rfc3339()),
            },
        );
    }

    pub fn remove(&mut self, team: &str) -> bool {
        let wanted = store_key(team);
        if wanted.is_empty() {
            return false;
        }
        let before = self.colors.len();
        self.colors.retain(|name, _| store_key(name) != wanted);
        self.colors.len() != before
    }

    pub fn colors(&self) -> impl Iterator<Item = (&str, &SavedColor)> {
        self.colors.iter().map(|(name, saved)| (name.as_str(), saved))
    }

    /// Keys for fuzzy matching against saved team names.
    pub fn match_keys(&self) -> Vec<(MatchKey, String)> {
        self.colors
            .keys()
            .map(|name| (MatchKey::new(name), name.clone()))
            .collect()
    }

    pub fn abbrev(&self, code: &str) -> Option<&str> {
        self.abbrevs
            .get(&code.trim().to_ascii_uppercase())
            .map(|s| s.as_str())
    }

    pub fn set_abbrev(&mut self, code: &str, full_name: &str) {
        self.abbrevs
            .insert(code.trim().to_ascii_uppercase(), full_name.trim().to_string());
    }

    pub fn abbrevs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.abbrevs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the whole store through a temp file and rename. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| ColorError::Store {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let file = StoreFile {
            version: STORE_VERSION,
            colors: self.colors.clone(),
            abbrevs: self.abbrevs.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| ColorError::Store {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| ColorError::Store {
            path: path.clone(),
            source,
        })?;
        debug!("saved override store {}", path.display());
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/kit_colors/team_colors.json`, else `~/.config/kit_colors/...`.
pub fn default_store_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(STORE_DIR).join(STORE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(STORE_DIR)
            .join(STORE_FILE),
    )
}

// Names with nothing left after normalisation compare by their trimmed spelling.
fn store_key(team: &str) -> String {
    let key = normalize_key(team);
    if key.is_empty() {
        team.trim().to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> HexColor {
        HexColor::parse("#C8102E").unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        fs::write(&path, "{ not json").unwrap();
        let store = OverrideStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn wrong_version_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        fs::write(
            &path,
            r##"{"version": 99, "colors": {"Wrexham": {"color": "#C8102E"}}}"##,
        )
        .unwrap();
        assert!(OverrideStore::load(&path).is_empty());
    }

    #[test]
    fn set_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("colors.json");
        let mut store = OverrideStore::load(&path);
        store.set("Wrexham", red());
        store.set_abbrev("wxm", "Wrexham");
        store.save().unwrap();

        let reloaded = OverrideStore::load(&path);
        assert_eq!(reloaded.get("wrexham"), Some(("Wrexham", red())));
        assert_eq!(reloaded.abbrev("WXM"), Some("Wrexham"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn set_replaces_same_normalised_name() {
        let mut store = OverrideStore::in_memory();
        store.set("Wrexham AFC", red());
        let blue = HexColor::parse("#0000FF").unwrap();
        store.set("wrexham afc", blue);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("WREXHAM-AFC").map(|(_, c)| c), Some(blue));
        assert!(store.remove("Wrexham AFC"));
        assert!(store.is_empty());
    }

    #[test]
    fn non_latin_names_are_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        let mut store = OverrideStore::load(&path);
        store.set("Олимпиакос", red());
        store.set("浦和レッズ", HexColor::parse("#E6002D").unwrap());
        store.set("???", HexColor::parse("#000000").unwrap());
        assert_eq!(store.len(), 3);
        store.save().unwrap();

        let store = OverrideStore::load(&path);
        assert_eq!(store.get("олимпиакос"), Some(("Олимпиакос", red())));
        assert_eq!(
            store.get(" 浦和レッズ ").map(|(_, c)| c.to_string()),
            Some("#E6002D".to_string())
        );
        assert!(store.get("???").is_some());
        assert!(store.get("!!!").is_none());
        assert!(store.get("   ").is_none());
    }

    #[test]
    fn in_memory_save_is_noop() {
        let mut store = OverrideStore::in_memory();
        store.set("Wrexham", red());
        store.save().unwrap();
        assert!(store.path().is_none());
    }
}
