//! # Undo Executor
//!
//! Turns one [`UndoLogEntry`] into a compensating statement and applies it on
//! the branch connection.
//!
//! ```text
//!   entry ──► build_undo_statement ──► (sql, parameter rows)
//!                                            │
//!                  data validation on? ──────┤
//!                        │ yes               │ no
//!                        ▼                   │
//!              re-read current rows          │
//!              per row: Proceed | AlreadyUndone | Conflict
//!                        │                   │
//!                        ▼                   ▼
//!              execute once per row that still needs compensation
//! ```
//!
//! | Original | Source image | Compensation                              |
//! |----------|--------------|-------------------------------------------|
//! | INSERT   | after        | `DELETE FROM t WHERE pk = ?`              |
//! | UPDATE   | before       | `UPDATE t SET col = ? WHERE pk = ?`       |
//! | DELETE   | before       | `INSERT INTO t (cols) VALUES (?)`         |
//!
//! Entry state machine:
//!
//! ```text
//!   Pending ─► Validating ─┬─► Applying ─► Applied
//!                          ├─► Skipped
//!                          ├─► Conflict
//!   (any) ─────────────────┴─► Fatal
//! ```

use std::fmt;

use log::{debug, error, info, warn};

use crate::catalog::table_meta::TableMeta;
use crate::common::config::{ConflictPolicy, UndoConfig};
use crate::common::exception::{ErrorClass, UndoError};
use crate::execution::connection::BranchConnection;
use crate::recovery::undo::data_validation::{self, RowVerdict};
use crate::recovery::undo::{delete_undo, insert_undo, update_undo};
use crate::recovery::undo_log::{SqlType, UndoLogEntry};
use crate::sql::handler::identifier_policy::IdentifierPolicy;
use crate::sql::sql_builder::SqlBuilder;
use crate::storage::table::row::Row;
use crate::storage::table::table_image::TableImage;
use crate::types_db::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoEntryState {
    Pending,
    Validating,
    Applying,
    Applied,
    Skipped,
    Conflict,
    Fatal,
}

impl UndoEntryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UndoEntryState::Applied
                | UndoEntryState::Skipped
                | UndoEntryState::Conflict
                | UndoEntryState::Fatal
        )
    }
}

impl fmt::Display for UndoEntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UndoEntryState::Pending => "PENDING",
            UndoEntryState::Validating => "VALIDATING",
            UndoEntryState::Applying => "APPLYING",
            UndoEntryState::Applied => "APPLIED",
            UndoEntryState::Skipped => "SKIPPED",
            UndoEntryState::Conflict => "CONFLICT",
            UndoEntryState::Fatal => "FATAL",
        };
        write!(f, "{}", name)
    }
}

/// A compensating statement with one parameter row per undo-image row.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoStatement {
    sql_type: SqlType,
    table_name: String,
    sql: String,
    pk_names: Vec<String>,
    parameter_rows: Vec<Vec<Value>>,
    row_keys: Vec<Vec<Value>>,
}

impl UndoStatement {
    pub(crate) fn new(
        sql_type: SqlType,
        table_name: &str,
        sql: String,
        pk_names: Vec<String>,
        parameter_rows: Vec<Vec<Value>>,
        row_keys: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            sql_type,
            table_name: table_name.to_string(),
            sql,
            pk_names,
            parameter_rows,
            row_keys,
        }
    }

    /// Kind of the original statement being compensated.
    pub fn get_sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    pub fn get_sql(&self) -> &str {
        &self.sql
    }

    /// Primary-key column names, unescaped, in key order.
    pub fn get_pk_names(&self) -> &[String] {
        &self.pk_names
    }

    pub fn get_parameter_rows(&self) -> &[Vec<Value>] {
        &self.parameter_rows
    }

    /// Primary-key values of each undo row, aligned with the parameter rows.
    pub fn get_row_keys(&self) -> &[Vec<Value>] {
        &self.row_keys
    }
}

/// Builds the compensating statement for `entry` without touching a database.
pub fn build_undo_statement(
    entry: &UndoLogEntry,
    policy: &dyn IdentifierPolicy,
    table_meta: Option<&TableMeta>,
) -> Result<UndoStatement, UndoError> {
    let builder = SqlBuilder::new(policy, table_meta);
    match entry.get_sql_type() {
        SqlType::Insert => insert_undo::build(entry, &builder, table_meta),
        SqlType::Update => update_undo::build(entry, &builder, table_meta),
        SqlType::Delete => delete_undo::build(entry, &builder, table_meta),
    }
}

/// The image `entry` must carry under `role`, rejecting a missing or empty one.
pub(crate) fn required_image<'e>(
    entry: &'e UndoLogEntry,
    image: Option<&'e TableImage>,
    role: &str,
) -> Result<&'e TableImage, UndoError> {
    match image {
        Some(image) if !image.is_empty() => Ok(image),
        Some(_) => Err(UndoError::InvalidUndoLog(format!(
            "{} undo of table {} has an empty {} image",
            entry.get_sql_type(),
            entry.get_table_name(),
            role
        ))),
        None => Err(UndoError::InvalidUndoLog(format!(
            "{} undo of table {} has no {} image",
            entry.get_sql_type(),
            entry.get_table_name(),
            role
        ))),
    }
}

/// Primary-key column names for the rows of `image`, spelled as the rows
/// spell them.
///
/// Fields flagged as key in the first row win, ordered by the schema key
/// order where metadata knows them. Rows captured without key flags fall back
/// to the schema-declared key. Every row must carry every key column.
pub(crate) fn resolve_primary_keys(
    table_name: &str,
    image: &TableImage,
    table_meta: Option<&TableMeta>,
) -> Result<Vec<String>, UndoError> {
    let first = image
        .first_row()
        .ok_or_else(|| UndoError::PrimaryKeyUnresolved {
            table: table_name.to_string(),
        })?;

    let mut flagged: Vec<&str> = first.primary_keys().iter().map(|f| f.get_name()).collect();
    let pk_names: Vec<String> = if !flagged.is_empty() {
        if let Some(meta) = table_meta {
            flagged.sort_by_key(|name| meta.primary_key_position(name).unwrap_or(usize::MAX));
        }
        flagged.into_iter().map(str::to_string).collect()
    } else {
        match table_meta {
            Some(meta) if !meta.primary_key_names().is_empty() => meta
                .primary_key_names()
                .iter()
                .map(|pk| match first.get_field(pk) {
                    Some(field) => field.get_name().to_string(),
                    None => pk.clone(),
                })
                .collect(),
            _ => {
                return Err(UndoError::PrimaryKeyUnresolved {
                    table: table_name.to_string(),
                });
            }
        }
    };

    for (i, row) in image.get_rows().iter().enumerate() {
        if let Some(missing) = pk_names.iter().find(|pk| row.get_field(pk).is_none()) {
            return Err(UndoError::InvalidUndoLog(format!(
                "row {} of table {} lacks primary key column {}",
                i, table_name, missing
            )));
        }
    }
    Ok(pk_names)
}

/// Values of `columns` in `row`, in the given order.
pub(crate) fn values_of(
    table_name: &str,
    row: &Row,
    columns: &[String],
) -> Result<Vec<Value>, UndoError> {
    columns
        .iter()
        .map(|column| {
            row.get_value(column).cloned().ok_or_else(|| {
                UndoError::InvalidUndoLog(format!(
                    "row of table {} lacks column {}",
                    table_name, column
                ))
            })
        })
        .collect()
}

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryReport {
    pub state: UndoEntryState,
    pub statements_executed: usize,
    pub rows_skipped: usize,
}

/// Applies single undo log entries on a branch connection.
pub struct UndoExecutor<'a> {
    policy: &'a dyn IdentifierPolicy,
    config: &'a UndoConfig,
}

impl<'a> UndoExecutor<'a> {
    pub fn new(policy: &'a dyn IdentifierPolicy, config: &'a UndoConfig) -> Self {
        Self { policy, config }
    }

    /// Compensates `entry` inside the transaction already open on `conn`.
    ///
    /// Returns the dirty-write error without executing anything for the entry
    /// when a conflict is found and the policy is not `SkipRow`.
    pub async fn execute<C>(
        &self,
        conn: &mut C,
        entry: &UndoLogEntry,
        table_meta: Option<&TableMeta>,
    ) -> Result<EntryReport, UndoError>
    where
        C: BranchConnection + ?Sized,
    {
        let mut state = UndoEntryState::Pending;

        let statement = match build_undo_statement(entry, self.policy, table_meta) {
            Ok(statement) => statement,
            Err(e) => {
                transition(&mut state, UndoEntryState::Fatal, entry);
                error!("Cannot compensate {} on {}: {}", entry.get_sql_type(), entry.get_table_name(), e);
                return Err(e);
            }
        };
        debug!(
            "Undo SQL for {} on {}: {} ({} rows)",
            entry.get_sql_type(),
            entry.get_table_name(),
            statement.get_sql(),
            statement.get_parameter_rows().len()
        );

        let mut verdicts = vec![RowVerdict::Proceed; statement.get_parameter_rows().len()];
        let mut rows_skipped = 0;

        if self.config.data_validation {
            transition(&mut state, UndoEntryState::Validating, entry);
            let builder = SqlBuilder::new(self.policy, table_meta);
            let report = match data_validation::validate(
                conn,
                entry,
                &statement,
                &builder,
                self.config.max_in_size,
            )
            .await
            {
                Ok(report) => report,
                Err(e) => {
                    if e.class() == ErrorClass::Fatal {
                        transition(&mut state, UndoEntryState::Fatal, entry);
                    }
                    return Err(e);
                }
            };

            if report.is_unchanged() {
                info!(
                    "Skipping {} undo on {}: images are identical",
                    entry.get_sql_type(),
                    entry.get_table_name()
                );
                transition(&mut state, UndoEntryState::Skipped, entry);
                return Ok(EntryReport {
                    state,
                    statements_executed: 0,
                    rows_skipped: 0,
                });
            }

            for (i, verdict) in report.get_verdicts().iter().enumerate() {
                match verdict {
                    RowVerdict::Proceed => {}
                    RowVerdict::AlreadyUndone => {
                        info!(
                            "Row [{}] of {} already compensated, skipping",
                            format_key(&statement.get_row_keys()[i]),
                            entry.get_table_name()
                        );
                        rows_skipped += 1;
                    }
                    RowVerdict::Conflict(detail) => {
                        let err = UndoError::DirtyWrite {
                            table: entry.get_table_name().to_string(),
                            key: format_key(&statement.get_row_keys()[i]),
                            detail: detail.clone(),
                        };
                        if self.config.conflict_policy == ConflictPolicy::SkipRow {
                            warn!("{}; leaving the row as it is", err);
                            rows_skipped += 1;
                        } else {
                            warn!("{}", err);
                            transition(&mut state, UndoEntryState::Conflict, entry);
                            return Err(err);
                        }
                    }
                }
            }
            verdicts = report.into_verdicts();
        }

        transition(&mut state, UndoEntryState::Applying, entry);
        let mut statements_executed = 0;
        for (params, verdict) in statement.get_parameter_rows().iter().zip(verdicts.iter()) {
            if *verdict != RowVerdict::Proceed {
                continue;
            }
            let affected = conn.execute(statement.get_sql(), params).await?;
            debug!("{} affected {} row(s)", statement.get_sql(), affected);
            statements_executed += 1;
        }

        let done = if statements_executed == 0 {
            UndoEntryState::Skipped
        } else {
            UndoEntryState::Applied
        };
        transition(&mut state, done, entry);
        Ok(EntryReport {
            state,
            statements_executed,
            rows_skipped,
        })
    }
}

fn transition(state: &mut UndoEntryState, next: UndoEntryState, entry: &UndoLogEntry) {
    debug!(
        "{} undo on {}: {} -> {}",
        entry.get_sql_type(),
        entry.get_table_name(),
        state,
        next
    );
    *state = next;
}

pub(crate) fn format_key(key: &[Value]) -> String {
    key.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
