use std::time::Duration;

use thiserror::Error;

/// Failures reported by a branch database connection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("Statement failed: {0}")]
    Statement(String),
    #[error("Transaction error: {0}")]
    Transaction(String),
    #[error("Connection closed")]
    ConnectionClosed,
}

/// How a failure maps onto the branch rollback outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed undo log or unusable setup; retrying cannot help.
    Fatal,
    /// Data changed underneath the branch since the original write.
    Conflict,
    /// Transient I/O or deadline expiry.
    Retryable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UndoError {
    #[error("Invalid undo log: {0}")]
    InvalidUndoLog(String),
    #[error("Cannot resolve primary key of table {table}")]
    PrimaryKeyUnresolved { table: String },
    #[error("Dirty write on table {table}, key [{key}]: {detail}")]
    DirtyWrite {
        table: String,
        key: String,
        detail: String,
    },
    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Undo log store error: {0}")]
    Store(String),
    #[error("Undo log codec error: {0}")]
    Codec(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Branch rollback exceeded deadline of {0:?}")]
    Timeout(Duration),
}

impl UndoError {
    pub fn class(&self) -> ErrorClass {
        match self {
            UndoError::InvalidUndoLog(_)
            | UndoError::PrimaryKeyUnresolved { .. }
            | UndoError::UnknownDialect(_)
            | UndoError::Codec(_)
            | UndoError::Config(_) => ErrorClass::Fatal,
            UndoError::DirtyWrite { .. } => ErrorClass::Conflict,
            UndoError::Database(_) | UndoError::Store(_) | UndoError::Timeout(_) => {
                ErrorClass::Retryable
            }
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.class() == ErrorClass::Conflict
    }
}
