//! # Table Metadata
//!
//! `TableMeta` describes a branch table the way the schema cache reports it:
//! an ordered list of columns, the declared primary key and whether the table
//! name itself was declared case-sensitive.
//!
//! The undo engine consults it for two decisions:
//!
//! | Question                               | Answered by                    |
//! |----------------------------------------|--------------------------------|
//! | Does this column name need quoting?    | `ColumnMeta::is_case_sensitive`|
//! | Does the table name need quoting?      | `TableMeta::is_case_sensitive` |
//! | Which fields form the primary key?     | `primary_key_names()`          |
//!
//! Column lookup tries the exact name first and falls back to a
//! case-insensitive match, because row images carry names as the driver
//! reported them while metadata may have been loaded with another case.

use crate::catalog::column::ColumnMeta;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    table_name: String,
    case_sensitive: bool,
    columns: Vec<ColumnMeta>,
    primary_keys: Vec<String>,
}

impl TableMeta {
    pub fn new(table_name: &str, columns: Vec<ColumnMeta>) -> Self {
        Self {
            table_name: table_name.to_string(),
            case_sensitive: false,
            columns,
            primary_keys: Vec::new(),
        }
    }

    /// Declares the primary key. Order is the schema-declared key order.
    pub fn with_primary_keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_case_sensitive_name(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn get_columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn get_column_meta(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|c| c.get_name() == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|c| c.get_name().eq_ignore_ascii_case(name))
            })
    }

    pub fn primary_key_names(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_keys
            .iter()
            .any(|pk| pk.eq_ignore_ascii_case(name))
    }

    /// Position of `name` inside the declared primary key.
    pub fn primary_key_position(&self, name: &str) -> Option<usize> {
        self.primary_keys
            .iter()
            .position(|pk| pk.eq_ignore_ascii_case(name))
    }
}
