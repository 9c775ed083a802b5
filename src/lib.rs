pub mod color;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod prompt;
pub mod resolver;
pub mod store;
pub mod team_db;

pub use color::HexColor;
pub use error::{ColorError, Result};
pub use resolver::{ColorResolver, ColorSource, Lookup, ResolutionResult, check_color_similarity};
