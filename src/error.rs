use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ColorError>;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidColorFormat(String),

    #[error("no color found for: {}", teams.join(", "))]
    MissingTeamColor { teams: Vec<String> },

    #[error("prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("override store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("override store is not valid json: {0}")]
    StoreFormat(#[from] serde_json::Error),
}
