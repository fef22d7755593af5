//! Conversions from anything that can describe itself as a mapping.

use serde_json::Value;

use super::Table;
use crate::Error;

/// Types that can export themselves as a nested mapping.
pub trait Exportable {
    fn export_mapping(&self) -> Table;
}

/// Types that can export themselves as JSON text.
pub trait ExportText {
    fn export_text(&self) -> String;
}

/// Input accepted by constructors and merges across the collection family.
pub enum Source<'a> {
    Table(Table),
    Value(Value),
    Mapping(&'a dyn Exportable),
    Text(&'a dyn ExportText),
}

impl<'a> Source<'a> {
    /// Wraps a value that only offers a text export.
    pub fn text(source: &'a dyn ExportText) -> Self {
        Source::Text(source)
    }

    /// Resolves the source to an owned mapping.
    ///
    /// Sequences are keyed by index, a lone scalar becomes `{"0": scalar}`
    /// and `null` becomes the empty mapping.
    pub fn into_table(self) -> Result<Table, Error> {
        match self {
            Source::Table(table) => Ok(table),
            Source::Value(value) => Ok(value_to_table(value)),
            Source::Mapping(source) => Ok(source.export_mapping()),
            Source::Text(source) => {
                let text = source.export_text();
                let value: Value = serde_json::from_str(&text).map_err(|e| {
                    Error::InvalidArgument(format!("exported text is not valid JSON: {e}"))
                })?;
                Ok(value_to_table(value))
            }
        }
    }
}

impl From<Table> for Source<'_> {
    fn from(table: Table) -> Self {
        Source::Table(table)
    }
}

impl From<Value> for Source<'_> {
    fn from(value: Value) -> Self {
        Source::Value(value)
    }
}

impl<'a, T: Exportable> From<&'a T> for Source<'a> {
    fn from(source: &'a T) -> Self {
        Source::Mapping(source)
    }
}

fn value_to_table(value: Value) -> Table {
    match value {
        Value::Object(table) => table,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        Value::Null => Table::new(),
        scalar => {
            let mut table = Table::new();
            table.insert("0".to_string(), scalar);
            table
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct JsonOnly(&'static str);

    impl ExportText for JsonOnly {
        fn export_text(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_sequence_is_keyed_by_index() {
        let table = Source::from(json!(["a", "b"])).into_table().unwrap();
        assert_eq!(Value::Object(table), json!({"0": "a", "1": "b"}));
    }

    #[test]
    fn test_scalar_and_null() {
        let table = Source::from(json!(5)).into_table().unwrap();
        assert_eq!(Value::Object(table), json!({"0": 5}));
        assert!(Source::from(Value::Null).into_table().unwrap().is_empty());
    }

    #[test]
    fn test_text_source() {
        let text = JsonOnly(r#"{"a": {"b": 1}}"#);
        let table = Source::text(&text).into_table().unwrap();
        assert_eq!(Value::Object(table), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_bad_text_source() {
        let text = JsonOnly("not json");
        let result = Source::text(&text).into_table();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
