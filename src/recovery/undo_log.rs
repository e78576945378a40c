use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::config::BranchId;
use crate::storage::table::table_image::TableImage;

/// Kind of the original DML statement an undo log entry compensates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Insert => write!(f, "INSERT"),
            SqlType::Update => write!(f, "UPDATE"),
            SqlType::Delete => write!(f, "DELETE"),
        }
    }
}

/// Row images recorded for one original statement of a branch.
///
/// INSERT entries carry only an after image, DELETE entries only a before
/// image, UPDATE entries both with `before.rows[i]` and `after.rows[i]`
/// describing the same logical row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoLogEntry {
    branch_id: BranchId,
    xid: String,
    table_name: String,
    sql_type: SqlType,
    before_image: Option<TableImage>,
    after_image: Option<TableImage>,
}

impl UndoLogEntry {
    pub fn new(
        branch_id: BranchId,
        xid: &str,
        table_name: &str,
        sql_type: SqlType,
        before_image: Option<TableImage>,
        after_image: Option<TableImage>,
    ) -> Self {
        Self {
            branch_id,
            xid: xid.to_string(),
            table_name: table_name.to_string(),
            sql_type,
            before_image,
            after_image,
        }
    }

    pub fn insert(branch_id: BranchId, xid: &str, after_image: TableImage) -> Self {
        let table = after_image.get_table_name().to_string();
        Self::new(branch_id, xid, &table, SqlType::Insert, None, Some(after_image))
    }

    pub fn update(
        branch_id: BranchId,
        xid: &str,
        before_image: TableImage,
        after_image: TableImage,
    ) -> Self {
        let table = before_image.get_table_name().to_string();
        Self::new(
            branch_id,
            xid,
            &table,
            SqlType::Update,
            Some(before_image),
            Some(after_image),
        )
    }

    pub fn delete(branch_id: BranchId, xid: &str, before_image: TableImage) -> Self {
        let table = before_image.get_table_name().to_string();
        Self::new(branch_id, xid, &table, SqlType::Delete, Some(before_image), None)
    }

    pub fn get_branch_id(&self) -> BranchId {
        self.branch_id
    }

    pub fn get_xid(&self) -> &str {
        &self.xid
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    pub fn get_sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn get_before_image(&self) -> Option<&TableImage> {
        self.before_image.as_ref()
    }

    pub fn get_after_image(&self) -> Option<&TableImage> {
        self.after_image.as_ref()
    }
}

/// All undo log entries of one branch, in original execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchUndoLog {
    xid: String,
    branch_id: BranchId,
    entries: Vec<UndoLogEntry>,
}

impl BranchUndoLog {
    pub fn new(xid: &str, branch_id: BranchId) -> Self {
        Self {
            xid: xid.to_string(),
            branch_id,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(xid: &str, branch_id: BranchId, entries: Vec<UndoLogEntry>) -> Self {
        Self {
            xid: xid.to_string(),
            branch_id,
            entries,
        }
    }

    pub fn push(&mut self, entry: UndoLogEntry) {
        self.entries.push(entry);
    }

    pub fn get_xid(&self) -> &str {
        &self.xid
    }

    pub fn get_branch_id(&self) -> BranchId {
        self.branch_id
    }

    pub fn get_entries(&self) -> &[UndoLogEntry] {
        &self.entries
    }

    /// Entries last-applied first, the order compensation must run in.
    pub fn undo_order(&self) -> impl Iterator<Item = &UndoLogEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
