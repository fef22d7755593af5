//! File formats and file loading.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ConfigError, ParseError};

/// A supported config file format.
///
/// `Native` is TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Native,
    Yaml,
    Json,
}

impl Format {
    /// Resolves a declared extension such as `".yml"`, `"json"` or `"*.toml"`.
    pub fn from_extension(extension: &str) -> Result<Self, ConfigError> {
        let normalized = extension.replace('*', "").to_lowercase();
        match normalized.trim_start_matches('.') {
            "toml" => Ok(Format::Native),
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(ConfigError::InvalidExtension(extension.to_string())),
        }
    }

    /// Resolves the format of a glob mask like `"*.yml"`.
    pub fn from_mask(mask: &str) -> Result<Self, ConfigError> {
        match Path::new(mask).extension() {
            Some(extension) => Self::from_extension(&extension.to_string_lossy()),
            None => Err(ConfigError::InvalidExtension(mask.to_string())),
        }
    }

    /// Infers the format from a file name.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension() {
            Some(extension) => Self::from_extension(&extension.to_string_lossy()),
            None => Err(ConfigError::InvalidExtension(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Native => "toml",
            Format::Yaml => "yml",
            Format::Json => "json",
        }
    }

    /// True if `path` carries an extension of this format.
    pub fn matches(self, path: &Path) -> bool {
        Self::from_path(path).is_ok_and(|format| format == self)
    }

    /// Parses raw text into a value tree.
    pub fn parse(self, text: &str) -> Result<Value, ParseError> {
        self.parse_as(text)
    }

    fn parse_as<T: DeserializeOwned>(self, text: &str) -> Result<T, ParseError> {
        Ok(match self {
            Format::Native => toml::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Json => serde_json::from_str(text)?,
        })
    }
}

/// Reads and parses a config file.
pub fn load_file(path: &Path, format: Format) -> Result<Value, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => format.parse(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Loads `input` as a file when it names one, otherwise parses it as text.
///
/// A bare path (one line, no whitespace) carrying the format's extension
/// that names no file is a missing file, not text.
pub fn load_file_or_text(input: &str, format: Format) -> Result<Value, ConfigError> {
    if looks_like_path(input) {
        let path = PathBuf::from(input);
        if path.is_file() || (!input.contains(char::is_whitespace) && format.matches(&path)) {
            return load_file(&path, format);
        }
    }

    format.parse(input).map_err(ConfigError::TextError)
}

fn looks_like_path(input: &str) -> bool {
    !input.is_empty() && !input.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension(".toml").unwrap(), Format::Native);
        assert_eq!(Format::from_extension("*.YML").unwrap(), Format::Yaml);
        assert_eq!(Format::from_extension("yaml").unwrap(), Format::Yaml);
        assert_eq!(Format::from_extension(".json").unwrap(), Format::Json);
        assert!(matches!(
            Format::from_extension(".php"),
            Err(ConfigError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_format_from_mask() {
        assert_eq!(Format::from_mask("*.json").unwrap(), Format::Json);
        assert!(matches!(
            Format::from_mask("*"),
            Err(ConfigError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_parse_each_format() {
        let native = Format::Native.parse("[test.address]\ncity = \"Vancouver\"\n").unwrap();
        let yaml = Format::Yaml.parse("test:\n  address:\n    city: Vancouver\n").unwrap();
        let json = Format::Json
            .parse(r#"{"test": {"address": {"city": "Vancouver"}}}"#)
            .unwrap();

        let expected = json!({"test": {"address": {"city": "Vancouver"}}});
        assert_eq!(native, expected);
        assert_eq!(yaml, expected);
        assert_eq!(json, expected);
    }

    #[test]
    fn test_load_file_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let result = load_file(file.path(), Format::Json);
        assert!(matches!(
            result,
            Err(ConfigError::ParseError {
                source: ParseError::Json(_),
                ..
            })
        ));
    }

    #[test]
    fn test_load_file_missing() {
        let result = load_file(Path::new("/nonexistent/path/config.toml"), Format::Native);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_text() {
        let value = load_file_or_text("name: app", Format::Yaml).unwrap();
        assert_eq!(value, json!({"name": "app"}));
    }

    #[test]
    fn test_load_text_ending_in_extension() {
        let value = load_file_or_text("include: base.yml", Format::Yaml).unwrap();
        assert_eq!(value, json!({"include": "base.yml"}));

        let value = load_file_or_text("name: app\nbase: common.yaml", Format::Yaml).unwrap();
        assert_eq!(value, json!({"name": "app", "base": "common.yaml"}));

        let value = load_file_or_text(r#"{"include": "base.json"}"#, Format::Json).unwrap();
        assert_eq!(value, json!({"include": "base.json"}));
    }

    #[test]
    fn test_load_existing_file_by_name() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "name: from file").unwrap();

        let value = load_file_or_text(&file.path().to_string_lossy(), Format::Yaml).unwrap();
        assert_eq!(value, json!({"name": "from file"}));
    }

    #[test]
    fn test_load_missing_named_file() {
        let result = load_file_or_text("/nonexistent/file-not-there.yml", Format::Yaml);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
