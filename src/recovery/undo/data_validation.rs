//! Dirty-write guard.
//!
//! Before a compensating statement touches a row, the row is re-read by
//! primary key and compared with what the branch itself left behind:
//!
//! | Current row equals | Verdict         | Meaning                               |
//! |--------------------|-----------------|---------------------------------------|
//! | after image        | `Proceed`       | untouched since the original write    |
//! | before image       | `AlreadyUndone` | an earlier attempt already compensated|
//! | neither            | `Conflict`      | another transaction wrote the row     |
//!
//! A missing image side stands for "row absent": an INSERT has no before
//! image, a DELETE has no after image.

use log::debug;

use crate::common::exception::UndoError;
use crate::execution::connection::BranchConnection;
use crate::recovery::undo::undo_executor::UndoStatement;
use crate::recovery::undo_log::UndoLogEntry;
use crate::sql::sql_builder::SqlBuilder;
use crate::storage::table::row::Row;
use crate::storage::table::table_image::{TableImage, first_difference, row_matches};
use crate::types_db::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict {
    Proceed,
    AlreadyUndone,
    Conflict(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    unchanged: bool,
    verdicts: Vec<RowVerdict>,
}

impl ValidationReport {
    /// The original statement changed nothing, so there is nothing to undo.
    pub fn is_unchanged(&self) -> bool {
        self.unchanged
    }

    /// One verdict per undo row, aligned with the statement's parameter rows.
    pub fn get_verdicts(&self) -> &[RowVerdict] {
        &self.verdicts
    }

    pub fn into_verdicts(self) -> Vec<RowVerdict> {
        self.verdicts
    }

    pub fn conflicts(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| matches!(v, RowVerdict::Conflict(_)))
            .count()
    }
}

/// Compares the current database rows with the entry's images.
pub async fn validate<C>(
    conn: &mut C,
    entry: &UndoLogEntry,
    statement: &UndoStatement,
    builder: &SqlBuilder<'_>,
    max_in_size: usize,
) -> Result<ValidationReport, UndoError>
where
    C: BranchConnection + ?Sized,
{
    let before = entry.get_before_image();
    let after = entry.get_after_image();

    if let (Some(before), Some(after)) = (before, after) {
        if before.semantically_equals(after) {
            return Ok(ValidationReport {
                unchanged: true,
                verdicts: Vec::new(),
            });
        }
    }

    let columns = recorded_columns(before, after);

    let keys = statement.get_row_keys();
    let select = builder.select_by_pks(
        statement.get_table_name(),
        &columns,
        statement.get_pk_names(),
        keys.len(),
        max_in_size,
    );
    let params: Vec<Value> = keys.iter().flatten().cloned().collect();
    debug!("Validating {} against current rows: {}", entry.get_table_name(), select);
    let current = TableImage::new(statement.get_table_name(), conn.query(&select, &params).await?);

    let pk_names = statement.get_pk_names();
    let mut verdicts = Vec::with_capacity(keys.len());
    for key in keys {
        let key_refs: Vec<&Value> = key.iter().collect();
        let current_row = current.find_by_key(pk_names, &key_refs);
        let expected_after = after.and_then(|image| image.find_by_key(pk_names, &key_refs));
        let expected_before = before.and_then(|image| image.find_by_key(pk_names, &key_refs));
        verdicts.push(judge(current_row, expected_after, expected_before));
    }

    Ok(ValidationReport {
        unchanged: false,
        verdicts,
    })
}

/// Column names recorded by either image, before-image columns first.
fn recorded_columns(before: Option<&TableImage>, after: Option<&TableImage>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    let fields = [before, after]
        .into_iter()
        .flatten()
        .filter_map(TableImage::first_row)
        .flat_map(|row| row.get_fields());
    for field in fields {
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(field.get_name())) {
            columns.push(field.get_name().to_string());
        }
    }
    columns
}

fn matches_image(current: Option<&Row>, expected: Option<&Row>) -> bool {
    match (current, expected) {
        (Some(current), Some(expected)) => row_matches(expected, current),
        (None, None) => true,
        _ => false,
    }
}

fn judge(current: Option<&Row>, after: Option<&Row>, before: Option<&Row>) -> RowVerdict {
    if matches_image(current, after) {
        return RowVerdict::Proceed;
    }
    if matches_image(current, before) {
        return RowVerdict::AlreadyUndone;
    }
    let detail = match (current, after) {
        (None, _) => "row no longer exists".to_string(),
        (Some(_), None) => "row was re-inserted by another transaction".to_string(),
        (Some(current), Some(after)) => match first_difference(after, current) {
            Some(field) => format!(
                "field {} is {} but the after image recorded {}",
                field,
                current
                    .get_value(field)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "absent".to_string()),
                after
                    .get_value(field)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "absent".to_string())
            ),
            None => "row differs from the after image".to_string(),
        },
    };
    RowVerdict::Conflict(detail)
}
