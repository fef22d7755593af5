//! Write-once attribute mapping.

use std::ops::Index;

use serde_json::Value;

use crate::items::{access, ExportText, Exportable, Source, Table};
use crate::Error;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq)]
enum State {
    #[default]
    Empty,
    Populated(Table),
}

/// A mapping that can be assigned exactly once.
///
/// Populating with an empty mapping still counts as the one assignment.
/// After that, reads only: there is no per-key write and removal fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    state: State,
}

impl Attributes {
    /// An unpopulated instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// A populated instance. Another `Attributes` is deep-copied.
    pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self, Error> {
        Ok(Self {
            state: State::Populated(source.into().into_table()?),
        })
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.state, State::Populated(_))
    }

    /// Populates an unpopulated instance.
    pub fn set_attributes<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
    ) -> Result<&mut Self, Error> {
        if self.is_populated() {
            return Err(Error::ImmutableViolation(
                "cannot use set_attributes once the items are populated".to_string(),
            ));
        }

        self.state = State::Populated(source.into().into_table()?);
        Ok(self)
    }

    /// Attribute `id`, or `None` when missing or null.
    pub fn get_attribute(&self, id: &str) -> Option<&Value> {
        self.table()?.get(id).filter(|value| !value.is_null())
    }

    /// Attribute `name`; a missing key is an error.
    pub fn attribute(&self, name: &str) -> Result<&Value, Error> {
        self.table()
            .and_then(|items| items.get(name))
            .ok_or_else(|| Error::InvalidArgument(format!("attribute '{name}' does not exist")))
    }

    /// Value at a dot-path.
    pub fn get(&self, key: &str) -> Option<&Value> {
        access::lookup(self.table()?, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table().is_some_and(|items| items.contains_key(key))
    }

    /// A clone of this instance.
    pub fn get_attributes(&self) -> Attributes {
        self.clone()
    }

    pub fn copy(&self) -> Table {
        self.table().cloned().unwrap_or_default()
    }

    /// Always fails once populated: attributes cannot be removed.
    pub fn remove(&mut self, key: &str) -> Result<(), Error> {
        if self.is_populated() {
            return Err(Error::ImmutableViolation(format!(
                "cannot remove attribute '{key}'"
            )));
        }
        Ok(())
    }

    /// Exported mapping. Values are plain trees, so this is the raw mapping.
    pub fn to_array(&self) -> Table {
        self.copy()
    }

    /// JSON text of the raw mapping.
    pub fn to_json(&self, pretty: bool) -> String {
        let value = Value::Object(self.copy());
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }

    fn table(&self) -> Option<&Table> {
        match &self.state {
            State::Populated(items) => Some(items),
            State::Empty => None,
        }
    }
}

impl Index<&str> for Attributes {
    type Output = Value;

    /// `null` when the key is missing.
    fn index(&self, key: &str) -> &Value {
        self.table().and_then(|items| items.get(key)).unwrap_or(&NULL)
    }
}

impl Exportable for Attributes {
    fn export_mapping(&self) -> Table {
        self.copy()
    }
}

impl ExportText for Attributes {
    fn export_text(&self) -> String {
        self.to_json(false)
    }
}
