use crate::storage::table::row::Row;
use crate::types_db::value::Value;
use serde::{Deserialize, Serialize};

/// Snapshot of the rows touched by one original statement, taken either just
/// before it ran ("before image") or just after ("after image").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableImage {
    table_name: String,
    rows: Vec<Row>,
}

impl TableImage {
    pub fn new(table_name: &str, rows: Vec<Row>) -> Self {
        Self {
            table_name: table_name.to_string(),
            rows,
        }
    }

    pub fn empty(table_name: &str) -> Self {
        Self::new(table_name, Vec::new())
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    pub fn get_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `pk_names` in `row`, in the given order. `None` if the row
    /// lacks any of them.
    pub fn key_of<'a>(row: &'a Row, pk_names: &[String]) -> Option<Vec<&'a Value>> {
        pk_names.iter().map(|pk| row.get_value(pk)).collect()
    }

    /// Finds the row whose key equals `key`.
    pub fn find_by_key(&self, pk_names: &[String], key: &[&Value]) -> Option<&Row> {
        self.rows.iter().find(|row| match Self::key_of(row, pk_names) {
            Some(candidate) => keys_equal(&candidate, key),
            None => false,
        })
    }

    /// Row-by-row comparison where every recorded field must match.
    pub fn semantically_equals(&self, other: &TableImage) -> bool {
        self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(other.rows.iter())
                .all(|(a, b)| row_matches(a, b) && row_matches(b, a))
    }
}

pub fn keys_equal(a: &[&Value], b: &[&Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.semantically_equals(y))
}

/// True when every field recorded in `expected` has the same value in `actual`.
pub fn row_matches(expected: &Row, actual: &Row) -> bool {
    expected.get_fields().iter().all(|field| {
        actual
            .get_value(field.get_name())
            .is_some_and(|value| field.get_value().semantically_equals(value))
    })
}

/// First recorded field of `expected` whose value differs in `actual`.
pub fn first_difference<'a>(expected: &'a Row, actual: &Row) -> Option<&'a str> {
    expected
        .get_fields()
        .iter()
        .find(|field| {
            !actual
                .get_value(field.get_name())
                .is_some_and(|value| field.get_value().semantically_equals(value))
        })
        .map(|field| field.get_name())
}
