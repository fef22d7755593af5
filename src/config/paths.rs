use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use serde_json::Value;
use tracing::warn;

use super::{ConfigError, ImportExport};
use crate::collection::CollectionOps;
use crate::items::{access, ExportText, Exportable, ItemAccess, Table};

/// A collection of named filesystem paths.
///
/// Every stored path is absolute, exists at the time it is added, and ends
/// with exactly one separator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    items: Table,
}

impl Paths {
    /// Builds a collection, normalizing every path in `paths`.
    pub fn new(paths: Table) -> Result<Self, ConfigError> {
        let mut collection = Self::default();
        collection.merge(paths)?;
        Ok(collection)
    }

    /// Adds a path under `key`. Dotted keys nest.
    pub fn add(&mut self, key: &str, path: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
        let normalized = normalize_path(path.as_ref())?;
        access::set(&mut self.items, key, Value::String(normalized));
        Ok(self)
    }

    /// Adds every entry of `paths`.
    ///
    /// Best effort: entries before a failing one stay added.
    pub fn merge(&mut self, paths: Table) -> Result<&mut Self, ConfigError> {
        for (key, value) in paths {
            match value {
                Value::String(path) => self.add(&key, path)?,
                other => return Err(ConfigError::InvalidPath(PathBuf::from(other.to_string()))),
            };
        }
        Ok(self)
    }

    pub fn forget(&mut self, key: &str) {
        access::forget(&mut self.items, key);
    }

    /// Path stored under `key`.
    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).and_then(Value::as_str).map(PathBuf::from)
    }
}

impl ItemAccess for Paths {
    fn items(&self) -> &Table {
        &self.items
    }
}

impl CollectionOps for Paths {
    fn from_items(items: Table) -> Self {
        Self { items }
    }
}

impl ImportExport for Paths {
    /// Imported entries are normalized like any other added path.
    fn merge_imported(&mut self, table: Table) -> Result<(), ConfigError> {
        self.merge(table).map(|_| ())
    }
}

impl Exportable for Paths {
    fn export_mapping(&self) -> Table {
        self.copy()
    }
}

impl ExportText for Paths {
    fn export_text(&self) -> String {
        self.to_json(false)
    }
}

/// Resolves `path` to an existing absolute path with one trailing separator.
pub fn normalize_path(path: &Path) -> Result<String, ConfigError> {
    let canonical = std::fs::canonicalize(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "cannot normalize path");
        ConfigError::InvalidPath(path.to_path_buf())
    })?;

    let mut normalized = canonical
        .to_string_lossy()
        .trim_end_matches(MAIN_SEPARATOR)
        .to_string();
    normalized.push(MAIN_SEPARATOR);

    Ok(normalized)
}
