//! Context container with named plugins.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::collection::sort_table;
use crate::items::{ExportText, Exportable, ItemAccess, ItemAccessMut, Source, Table};
use crate::Error;

/// A plugin body. Receives the scope it was called on and the call arguments.
pub type Plugin = Arc<dyn Fn(&mut Scope, &[Value]) -> Value + Send + Sync>;

/// Context items plus a registry of plugins dispatched by name.
///
/// The registry is never part of the exported items.
///
/// ## Example
///
/// ```
/// use dragon_collections::Scope;
/// use serde_json::{json, Value};
///
/// let mut scope = Scope::builder()
///     .with_items(json!({"greeting": "hello"}))
///     .with_plugin("shout", |scope, _args| {
///         let greeting = scope.get_str("greeting").unwrap_or_default();
///         Value::from(greeting.to_uppercase())
///     })
///     .build()?;
///
/// assert_eq!(scope.call("shout", &[])?, json!("HELLO"));
/// # Ok::<(), dragon_collections::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Scope {
    items: Table,
    plugins: Vec<(String, Plugin)>,
}

impl Scope {
    pub fn new(items: Table) -> Self {
        Self {
            items,
            plugins: Vec::new(),
        }
    }

    pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self, Error> {
        Ok(Self::new(source.into().into_table()?))
    }

    /// Creates a new builder for constructing a `Scope`.
    pub fn builder<'a>() -> ScopeBuilder<'a> {
        ScopeBuilder {
            items: None,
            plugins: Vec::new(),
        }
    }

    /// Registers `plugin` under `name`, replacing any plugin of that name.
    pub fn plugin<F>(&mut self, name: impl Into<String>, plugin: F) -> &mut Self
    where
        F: Fn(&mut Scope, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.register(name.into(), Arc::new(plugin));
        self
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Removes a plugin if present, optionally sorting the registry by name.
    pub fn forget_plugin(&mut self, name: &str, sort: bool) {
        if let Some(index) = self.position(name) {
            self.plugins.remove(index);
            if sort {
                self.plugins.sort_by(|(a, _), (b, _)| a.cmp(b));
            }
        }
    }

    /// Calls the plugin registered under `name` with `args`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let plugin = match self.position(name) {
            Some(index) => Arc::clone(&self.plugins[index].1),
            None => return Err(Error::UnknownPlugin(name.to_string())),
        };

        trace!(plugin = name, args = args.len(), "dispatching plugin");
        Ok(plugin(self, args))
    }

    /// String value at a dot-path.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sorts the items by key.
    pub fn sort(&mut self) -> &mut Self {
        sort_table(&mut self.items);
        self
    }

    pub fn to_array(&self) -> Table {
        self.items.clone()
    }

    pub fn to_json(&self, pretty: bool) -> String {
        let value = Value::Object(self.items.clone());
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }

    fn register(&mut self, name: String, plugin: Plugin) {
        debug!(plugin = %name, "registering plugin");
        match self.position(&name) {
            Some(index) => self.plugins[index].1 = plugin,
            None => self.plugins.push((name, plugin)),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|(registered, _)| registered == name)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("items", &self.items)
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

impl ItemAccess for Scope {
    fn items(&self) -> &Table {
        &self.items
    }
}

impl ItemAccessMut for Scope {
    fn items_mut(&mut self) -> &mut Table {
        &mut self.items
    }
}

impl Exportable for Scope {
    fn export_mapping(&self) -> Table {
        self.to_array()
    }
}

impl ExportText for Scope {
    fn export_text(&self) -> String {
        self.to_json(false)
    }
}

/// Builder for constructing a [`Scope`].
#[must_use = "builders do nothing until .build() is called"]
pub struct ScopeBuilder<'a> {
    items: Option<Source<'a>>,
    plugins: Vec<(String, Plugin)>,
}

impl<'a> ScopeBuilder<'a> {
    /// Sets the initial items.
    pub fn with_items(mut self, items: impl Into<Source<'a>>) -> Self {
        self.items = Some(items.into());
        self
    }

    pub fn with_plugin<F>(mut self, name: impl Into<String>, plugin: F) -> Self
    where
        F: Fn(&mut Scope, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.plugins.push((name.into(), Arc::new(plugin)));
        self
    }

    /// Builds the `Scope`.
    ///
    /// Returns an error if the items cannot be resolved to a mapping.
    pub fn build(self) -> Result<Scope, Error> {
        let items = match self.items {
            Some(source) => source.into_table()?,
            None => Table::new(),
        };

        let mut scope = Scope::new(items);
        for (name, plugin) in self.plugins {
            scope.register(name, plugin);
        }
        Ok(scope)
    }
}
