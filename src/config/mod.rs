//! Configuration collections: file import and path handling.

mod error;
mod file;
mod import;
mod paths;
mod transfer;

pub use error::{ConfigError, ParseError};
pub use file::{load_file, load_file_or_text, Format};
pub use import::{Config, DEFAULT_MASK};
pub use paths::{normalize_path, Paths};
pub use transfer::ImportExport;
