pub mod attributes;
pub mod collection;
pub mod config;
pub mod items;
pub mod scope;
mod error;

pub use attributes::Attributes;
pub use collection::{Collection, CollectionOps};
pub use config::{Config, ConfigError, Format, ImportExport, Paths};
pub use error::Error;
pub use items::{ExportText, Exportable, Fallback, ItemAccess, ItemAccessMut, Source, Table};
pub use scope::{Plugin, Scope, ScopeBuilder};
