//! Document import and export shared by [`Config`](super::Config) and
//! [`Paths`](super::Paths).

use serde_json::Value;
use tracing::warn;

use super::file::{load_file_or_text, Format};
use super::ConfigError;
use crate::items::{ItemAccess, Table};

/// Import of whole documents and export in every supported format.
///
/// Implementors decide how an imported mapping joins their items.
pub trait ImportExport: ItemAccess {
    /// Merges a parsed document into the items.
    fn merge_imported(&mut self, table: Table) -> Result<(), ConfigError>;

    /// Merges a JSON document (file name or text).
    fn import_json(&mut self, json: &str) -> Result<&mut Self, ConfigError> {
        self.import_document(json, Format::Json)
    }

    /// Merges a YAML document (file name or text).
    fn import_yaml(&mut self, yaml: &str) -> Result<&mut Self, ConfigError> {
        self.import_document(yaml, Format::Yaml)
    }

    /// Merges a native (TOML) document (file name or text).
    fn import_native(&mut self, native: &str) -> Result<&mut Self, ConfigError> {
        self.import_document(native, Format::Native)
    }

    /// Non-mapping documents are ignored.
    fn import_document(&mut self, input: &str, format: Format) -> Result<&mut Self, ConfigError> {
        match load_file_or_text(input, format)? {
            Value::Object(table) => self.merge_imported(table)?,
            _ => warn!(format = format.extension(), "document is not a mapping, ignoring"),
        }
        Ok(self)
    }

    fn export_json(&self, pretty: bool) -> String {
        let value = Value::Object(self.copy());
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }

    fn export_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self.items()).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Serializes the items in the native (TOML) format.
    fn export_native(&self) -> Result<String, ConfigError> {
        toml::to_string(self.items()).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
