use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::file::{load_file, Format};
use super::{ConfigError, ImportExport};
use crate::collection::CollectionOps;
use crate::items::{ExportText, Exportable, ItemAccess, ItemAccessMut, Source, Table};
use crate::Error;

/// Mask used by [`Config::create_from_folder`].
pub const DEFAULT_MASK: &str = "*.toml";

/// A configuration collection with file import and export.
///
/// Each imported file lands under a root key named after the file stem, so
/// `config/db.yml` is read back with `config.get("db.host")`. A root key
/// that already holds a value is never overwritten by a later import.
///
/// ## Example
///
/// ```no_run
/// use dragon_collections::{Config, ItemAccess};
///
/// let mut config = Config::create_from_folder("config")?;
/// config.import_folder("config", "*.yml")?;
///
/// let city = config.get_or("test.address.city", serde_json::json!("Unknown"));
/// # Ok::<(), dragon_collections::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    items: Table,
}

impl Config {
    pub fn new(items: Table) -> Self {
        Self { items }
    }

    pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self, Error> {
        Ok(Self::new(source.into().into_table()?))
    }

    /// Creates a config from every `*.toml` file in `folder`.
    pub fn create_from_folder(folder: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.import_folder(folder, DEFAULT_MASK)?;
        Ok(config)
    }

    /// Creates a config from a JSON file name or JSON text.
    pub fn create_from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.import_json(json)?;
        Ok(config)
    }

    /// Creates a config from a YAML file name or YAML text.
    pub fn create_from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.import_yaml(yaml)?;
        Ok(config)
    }

    /// Sets every entry of `import`, as [`set`](ItemAccessMut::set) would.
    pub fn import_array(&mut self, import: Table) -> &mut Self {
        for (key, value) in import {
            self.set(&key, value);
        }
        self
    }

    /// Imports one file under its stem. The format comes from the extension.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        self.import_with_format(path, format)?;
        Ok(self)
    }

    /// Imports every file in `base_path` matching `mask`, e.g. `"*.yml"`.
    ///
    /// Not atomic: files imported before a failure stay imported.
    pub fn import_folder(
        &mut self,
        base_path: impl AsRef<Path>,
        mask: &str,
    ) -> Result<&mut Self, ConfigError> {
        let format = Format::from_mask(mask)?;
        for file in parse_folder(base_path.as_ref(), mask)? {
            self.import_with_format(&file, format)?;
        }
        Ok(self)
    }

    /// Root-level setting by exact key.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    fn import_with_format(&mut self, path: &Path, format: Format) -> Result<(), ConfigError> {
        let key = root_key(path)?;

        if self.has(&key) {
            debug!(key = %key, path = %path.display(), "root key exists, skipping import");
            return Ok(());
        }

        let value = load_file(path, format)?;
        if value.is_object() {
            debug!(key = %key, path = %path.display(), "imported config file");
            self.set(&key, value);
        } else {
            warn!(path = %path.display(), "config file is not a mapping, ignoring");
        }

        Ok(())
    }
}

impl ItemAccess for Config {
    fn items(&self) -> &Table {
        &self.items
    }
}

impl ItemAccessMut for Config {
    fn items_mut(&mut self) -> &mut Table {
        &mut self.items
    }
}

impl ImportExport for Config {
    fn merge_imported(&mut self, table: Table) -> Result<(), ConfigError> {
        self.search_and_replace(table);
        Ok(())
    }
}

impl CollectionOps for Config {
    fn from_items(items: Table) -> Self {
        Self::new(items)
    }
}

impl Exportable for Config {
    fn export_mapping(&self) -> Table {
        self.copy()
    }
}

impl ExportText for Config {
    fn export_text(&self) -> String {
        self.to_json(false)
    }
}

/// `config/happy.yml` -> `happy`.
fn root_key(path: &Path) -> Result<String, ConfigError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ConfigError::InvalidPath(path.to_path_buf()))
}

/// Globs `mask` inside the canonicalized `base_path`, in alphabetical order.
fn parse_folder(base_path: &Path, mask: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let base = std::fs::canonicalize(base_path)
        .map_err(|_| ConfigError::InvalidPath(base_path.to_path_buf()))?;
    let pattern = base.join(mask).to_string_lossy().into_owned();

    let entries = glob::glob(&pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "unreadable folder entry, skipping"),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn app_config() -> Config {
        Config::from_source(json!({
            "app": {
                "files": "OS::Folders",
                "views": {
                    "home": "HomeViewController",
                    "contact": "ContactViewController",
                },
                "controllers": {
                    "login": "LoginHttpController",
                    "dashboard": "DashboardHttpController",
                },
            },
        }))
        .unwrap()
    }

    fn config_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("app.toml"),
            "title = \"Blade Test Template\"\nproviders = [\"Debug\", \"Session\"]\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("db.toml"),
            "[models]\nhome = \"HomeModel\"\ncontact = \"ContactModel\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("test.toml"),
            "[address]\ncity = \"Vancouver\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"test": {"address": {"city": "Vancouver"}}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("config.yml"),
            "test:\n  address:\n    city: Vancouver\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_dotted_access() {
        let config = app_config();
        assert_eq!(
            config.get("app.views"),
            Some(&json!({"home": "HomeViewController", "contact": "ContactViewController"}))
        );
        assert_eq!(
            config.get("app.controllers"),
            Some(&json!({"login": "LoginHttpController", "dashboard": "DashboardHttpController"}))
        );
        assert_eq!(config.get("app.files"), Some(&json!("OS::Folders")));
    }

    #[test]
    fn test_import_array() {
        let mut config = app_config();
        let Value::Object(import) = json!({
            "db": {
                "files": null,
                "models": {"home": "HomeModel", "contact": "ContactModel"},
            },
            "app.title": "Blade",
        }) else {
            unreachable!()
        };

        config.import_array(import);
        assert!(config.has("app"));
        assert!(config.has("db"));
        assert_eq!(config.get("app.title"), Some(&json!("Blade")));
        assert_eq!(config.get("app.files"), Some(&json!("OS::Folders")));
    }

    #[test]
    fn test_import_array_appends_to_sequences() {
        let mut config = Config::from_source(json!({"app": {"providers": ["Debug"]}})).unwrap();
        let Value::Object(import) = json!({
            "app.providers[]": "Session",
            "[]": "first",
        }) else {
            unreachable!()
        };

        config.import_array(import);
        assert_eq!(
            config.get("app.providers"),
            Some(&json!(["Debug", "Session"]))
        );
        assert_eq!(config.get("0"), Some(&json!("first")));
        assert!(!config.has(""));
    }

    #[test]
    fn test_import_array_matches_set() {
        let mut imported = app_config();
        let mut assigned = app_config();
        let Value::Object(import) = json!({
            "app.views.about": "AboutViewController",
            "app.controllers[]": "Extra",
            "db.host": "localhost",
        }) else {
            unreachable!()
        };

        for (key, value) in import.clone() {
            assigned.set(&key, value);
        }
        imported.import_array(import);
        assert_eq!(imported, assigned);
    }

    #[test]
    fn test_create_from_yaml_text_naming_a_file() {
        let config = Config::create_from_yaml("include: base.yml").unwrap();
        assert_eq!(config.get("include"), Some(&json!("base.yml")));
    }

    #[test]
    fn test_import_folder_keys_by_file_stem() {
        let dir = config_folder();
        let mut config = app_config();
        config.import_folder(dir.path(), DEFAULT_MASK).unwrap();

        assert!(config.has("app"));
        assert!(config.has("db"));
        assert!(config.has("test"));
        assert_eq!(config.get("test.address.city"), Some(&json!("Vancouver")));
        // app already existed, app.toml is skipped
        assert_eq!(config.get("app.title"), None);
    }

    #[test]
    fn test_import_folder_json_and_yaml() {
        let dir = config_folder();

        let mut json_config = Config::default();
        json_config.import_folder(dir.path(), "*.json").unwrap();
        assert_eq!(
            json_config.get("config.test.address.city"),
            Some(&json!("Vancouver"))
        );

        let mut yaml_config = Config::default();
        yaml_config.import_folder(dir.path(), "*.yml").unwrap();
        assert_eq!(
            yaml_config.get("config.test.address.city"),
            Some(&json!("Vancouver"))
        );
    }

    #[test]
    fn test_import_folder_twice_is_noop() {
        let dir = config_folder();
        let mut config = Config::create_from_folder(dir.path()).unwrap();
        let first = config.copy();

        fs::write(dir.path().join("db.toml"), "changed = true\n").unwrap();
        config.import_folder(dir.path(), DEFAULT_MASK).unwrap();
        assert_eq!(config.copy(), first);
    }

    #[test]
    fn test_null_root_counts_as_absent() {
        let dir = config_folder();
        let mut config = Config::from_source(json!({"db": null})).unwrap();
        config.import_file(dir.path().join("db.toml")).unwrap();
        assert_eq!(config.get("db.models.home"), Some(&json!("HomeModel")));
    }

    #[test]
    fn test_invalid_extension_before_io() {
        let mut config = Config::default();
        let result = config.import_file("/nonexistent/settings.php");
        assert!(matches!(result, Err(ConfigError::InvalidExtension(_))));

        let result = config.import_folder("/nonexistent", "*.ini");
        assert!(matches!(result, Err(ConfigError::InvalidExtension(_))));
    }

    #[test]
    fn test_import_missing_folder() {
        let mut config = Config::default();
        let result = config.import_folder("/nonexistent/folder", "*.yml");
        assert!(matches!(result, Err(ConfigError::InvalidPath(_))));
    }

    #[test]
    fn test_import_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nope").unwrap();

        let mut config = Config::default();
        let result = config.import_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
        assert!(!config.has("broken"));
    }

    #[test]
    fn test_non_mapping_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut config = Config::default();
        config.import_file(&path).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_create_from_yaml() {
        let dir = config_folder();
        let path = dir.path().join("config.yml");
        let config = Config::create_from_yaml(&path.to_string_lossy()).unwrap();
        assert_eq!(config.get("test.address.city"), Some(&json!("Vancouver")));

        let result = Config::create_from_yaml("/nonexistent/file-not-there.yml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_create_from_json_text() {
        let config = Config::create_from_json(r#"{"a": {"b": [1, 2]}}"#).unwrap();
        assert_eq!(config.get("a.b.1"), Some(&json!(2)));
    }

    #[test]
    fn test_setting_is_root_level() {
        let config = app_config();
        assert!(config.setting("app").is_some());
        assert!(config.setting("app.files").is_none());
    }

    #[test]
    fn test_export_round_trips_through_formats() {
        let config = app_config();

        let yaml = Config::create_from_yaml(&config.export_yaml().unwrap()).unwrap();
        assert_eq!(yaml, config);

        let native = config.export_native().unwrap();
        assert!(native.contains("HomeViewController"));
        let reparsed = Format::Native.parse(&native).unwrap();
        assert_eq!(reparsed, Value::Object(config.copy()));

        let json = Config::create_from_json(&config.export_json(true)).unwrap();
        assert_eq!(json, config);
    }

    #[test]
    fn test_chunk_keeps_type() {
        let chunks: Vec<Config> = app_config().chunk(1).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].has("app.views.home"));
    }
}
