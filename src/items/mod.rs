//! Dot-notation access shared by every container.

pub mod access;
pub mod path;
mod source;

use serde_json::Value;

pub use access::Fallback;
pub use path::{expand_segments, parse_segments, Segment};
pub use source::{ExportText, Exportable, Source};

use crate::Error;

/// Backing mapping of every container. Keys keep insertion order.
pub type Table = serde_json::Map<String, Value>;

/// Read access to a container's items by dot-path.
pub trait ItemAccess {
    fn items(&self) -> &Table;

    /// Value at `key`, or `None` when any segment is missing.
    fn get(&self, key: &str) -> Option<&Value> {
        access::lookup(self.items(), key)
    }

    /// Owned value at `key`, or the fallback on a miss.
    fn get_or(&self, key: &str, default: impl Into<Fallback>) -> Value {
        access::query(self.items(), Some(key), default.into())
    }

    /// Like [`get_or`](Self::get_or), but `None` returns the whole tree.
    fn query(&self, key: Option<&str>, default: impl Into<Fallback>) -> Value {
        access::query(self.items(), key, default.into())
    }

    /// True when `key` holds a non-null value.
    ///
    /// A stored `null` reads as absent.
    fn has(&self, key: &str) -> bool {
        access::has(self.items(), key)
    }

    /// Deep copy of the items.
    fn copy(&self) -> Table {
        self.items().clone()
    }
}

/// Dot-path writes.
pub trait ItemAccessMut: ItemAccess {
    fn items_mut(&mut self) -> &mut Table;

    fn set(&mut self, key: &str, value: impl Into<Value>) {
        access::set(self.items_mut(), key, value.into());
    }

    /// Sets `key` only if it is absent.
    fn append(&mut self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        if self.has(key) {
            return Err(Error::InvalidArgument(format!(
                "cannot append an already existing key: '{key}'"
            )));
        }
        self.set(key, value);
        Ok(())
    }

    fn forget(&mut self, key: &str) {
        access::forget(self.items_mut(), key);
    }

    /// Shallow merge: incoming root-level values replace existing ones.
    fn merge<'a>(&mut self, source: impl Into<Source<'a>>) -> Result<&mut Self, Error> {
        let incoming = source.into().into_table()?;
        self.items_mut().extend(incoming);
        Ok(self)
    }

    /// Deep-merges a whole mapping into the items.
    fn search_and_replace(&mut self, table: Table) {
        access::deep_merge(self.items_mut(), table);
    }
}
