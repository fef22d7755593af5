//! Keyed collections and their whole-collection operations.

use serde_json::Value;

use crate::items::{access, ExportText, Exportable, ItemAccess, ItemAccessMut, Source, Table};
use crate::Error;

/// Whole-collection operations shared by [`Collection`] and its
/// specializations. Results that are collections keep the concrete type.
pub trait CollectionOps: ItemAccess + Sized {
    /// Builds a collection of the same type around already-prepared items.
    fn from_items(items: Table) -> Self;

    fn all(&self) -> &Table {
        self.items()
    }

    fn count(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// First root-level value, `None` when empty.
    fn first(&self) -> Option<&Value> {
        self.items().values().next()
    }

    /// Last root-level value, `None` when empty.
    fn last(&self) -> Option<&Value> {
        self.items().values().next_back()
    }

    fn keys(&self) -> Vec<&str> {
        self.items().keys().map(String::as_str).collect()
    }

    /// Splits the root-level pairs into groups of at most `size`, in order.
    fn chunk(&self, size: usize) -> Result<Vec<Self>, Error> {
        if size == 0 {
            return Err(Error::InvalidArgument(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        let mut chunks = Vec::with_capacity(self.count().div_ceil(size));
        let mut current = Table::new();

        for (key, value) in self.items() {
            current.insert(key.clone(), value.clone());
            if current.len() == size {
                chunks.push(Self::from_items(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            chunks.push(Self::from_items(current));
        }

        Ok(chunks)
    }

    /// Merges every first-level mapping into one mapping. Later keys win;
    /// non-mapping values are dropped.
    fn collapse(&self) -> Table {
        let mut collapsed = Table::new();

        for value in self.items().values() {
            if let Value::Object(table) = value {
                for (key, value) in table {
                    collapsed.insert(key.clone(), value.clone());
                }
            }
        }

        collapsed
    }

    /// True if a first-level value equals `item`.
    fn contains(&self, item: &Value) -> bool {
        self.items().values().any(|value| value == item)
    }

    /// First-level entries whose value at `field` equals `expected`.
    /// Original keys are kept.
    fn where_eq(&self, field: &str, expected: &Value) -> Self {
        let filtered = self
            .items()
            .iter()
            .filter(|(_, entry)| match entry {
                Value::Object(table) => access::lookup(table, field) == Some(expected),
                _ => false,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self::from_items(filtered)
    }

    fn to_array(&self) -> Table {
        self.copy()
    }

    /// JSON text of the items, pretty-printed on request.
    fn to_json(&self, pretty: bool) -> String {
        let value = Value::Object(self.copy());
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }
}

/// An ordered keyed container over a nested mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Table,
}

impl Collection {
    pub fn new(items: Table) -> Self {
        Self { items }
    }

    /// Builds a collection from any [`Source`].
    pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self, Error> {
        Ok(Self::new(source.into().into_table()?))
    }

    /// Sorts the root-level entries by key.
    pub fn sort(&mut self) -> &mut Self {
        sort_table(&mut self.items);
        self
    }
}

impl ItemAccess for Collection {
    fn items(&self) -> &Table {
        &self.items
    }
}

impl ItemAccessMut for Collection {
    fn items_mut(&mut self) -> &mut Table {
        &mut self.items
    }
}

impl CollectionOps for Collection {
    fn from_items(items: Table) -> Self {
        Self::new(items)
    }
}

impl Exportable for Collection {
    fn export_mapping(&self) -> Table {
        self.copy()
    }
}

impl ExportText for Collection {
    fn export_text(&self) -> String {
        self.to_json(false)
    }
}

impl From<Table> for Collection {
    fn from(items: Table) -> Self {
        Self::new(items)
    }
}

pub(crate) fn sort_table(table: &mut Table) {
    let mut entries: Vec<(String, Value)> = std::mem::take(table).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    table.extend(entries);
}
