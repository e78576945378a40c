//! # SQL Builder
//!
//! Assembles the parameterized statements used by undo execution. All
//! identifiers pass through the dialect's [`IdentifierPolicy`]; values are
//! never inlined, every value position is a `?` placeholder.
//!
//! | Statement            | Shape                                                   |
//! |----------------------|---------------------------------------------------------|
//! | `update`             | `UPDATE t SET a = ?, b = ? WHERE pk1 = ? AND pk2 = ?`   |
//! | `insert`             | `INSERT INTO t (a, b) VALUES (?, ?)`                    |
//! | `delete`             | `DELETE FROM t WHERE pk1 = ? AND pk2 = ?`               |
//! | `select_by_pks`      | `SELECT a, b FROM t WHERE pk IN (?, ?)`                 |
//! |                      | `SELECT a, b FROM t WHERE (pk1, pk2) IN ((?, ?), ...)`  |
//!
//! Key lists longer than `max_in_size` are split into several `IN` groups
//! joined with `OR`, keeping each group under the database's list limit.

use crate::catalog::table_meta::TableMeta;
use crate::sql::handler::identifier_policy::IdentifierPolicy;

pub struct SqlBuilder<'a> {
    policy: &'a dyn IdentifierPolicy,
    table_meta: Option<&'a TableMeta>,
}

impl<'a> SqlBuilder<'a> {
    pub fn new(policy: &'a dyn IdentifierPolicy, table_meta: Option<&'a TableMeta>) -> Self {
        Self { policy, table_meta }
    }

    pub fn table(&self, table_name: &str) -> String {
        self.policy.add_table_escape(table_name, self.table_meta)
    }

    pub fn column(&self, column_name: &str) -> String {
        self.policy.add_escape(column_name, self.table_meta)
    }

    pub fn columns(&self, column_names: &[String]) -> Vec<String> {
        column_names.iter().map(|c| self.column(c)).collect()
    }

    /// `pk1 = ? AND pk2 = ?`
    pub fn where_by_pks(&self, pk_names: &[String]) -> String {
        self.columns(pk_names)
            .iter()
            .map(|pk| format!("{} = ?", pk))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Key-list condition for `row_count` keys. Parameters bind row-major: all
    /// key columns of the first row, then of the second, and so on.
    pub fn where_by_pks_in(&self, pk_names: &[String], row_count: usize, max_in_size: usize) -> String {
        let pks = self.columns(pk_names);
        let max_in_size = max_in_size.max(1);
        let tuple = if pks.len() == 1 {
            "?".to_string()
        } else {
            format!("({})", vec!["?"; pks.len()].join(", "))
        };
        let target = if pks.len() == 1 {
            pks[0].clone()
        } else {
            format!("({})", pks.join(", "))
        };

        let mut groups = Vec::new();
        let mut remaining = row_count;
        while remaining > 0 {
            let size = remaining.min(max_in_size);
            groups.push(format!(
                "{} IN ({})",
                target,
                vec![tuple.as_str(); size].join(", ")
            ));
            remaining -= size;
        }
        groups.join(" OR ")
    }

    pub fn update(&self, table_name: &str, set_columns: &[String], pk_names: &[String]) -> String {
        let assignments = self
            .columns(set_columns)
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE {}",
            self.table(table_name),
            assignments,
            self.where_by_pks(pk_names)
        )
    }

    pub fn insert(&self, table_name: &str, columns: &[String]) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(table_name),
            self.columns(columns).join(", "),
            vec!["?"; columns.len()].join(", ")
        )
    }

    pub fn delete(&self, table_name: &str, pk_names: &[String]) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.table(table_name),
            self.where_by_pks(pk_names)
        )
    }

    pub fn select_by_pks(
        &self,
        table_name: &str,
        columns: &[String],
        pk_names: &[String],
        row_count: usize,
        max_in_size: usize,
    ) -> String {
        format!(
            "SELECT {} FROM {} WHERE {}",
            self.columns(columns).join(", "),
            self.table(table_name),
            self.where_by_pks_in(pk_names, row_count, max_in_size)
        )
    }
}
