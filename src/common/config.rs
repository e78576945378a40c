use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::exception::UndoError;

pub type BranchId = i64;

/// Dialect used when neither the caller nor the configuration names one.
pub const DEFAULT_DIALECT: &str = "mysql";

/// Upper bound of primary-key tuples inside one `IN (...)` group.
pub const DEFAULT_MAX_IN_SIZE: usize = 1000;

/// What to do when the dirty-write guard finds a row changed by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Abort the whole branch rollback with a retryable conflict.
    #[default]
    Abort,
    /// Leave the conflicting row as it is and compensate the others.
    SkipRow,
    /// Abort and report the conflict as non-retryable, for manual repair.
    Escalate,
}

/// Encoding of persisted branch undo logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSerialization {
    #[default]
    Json,
    Bincode,
}

/// Configuration of the undo engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    pub dialect: String,
    pub data_validation: bool,
    pub conflict_policy: ConflictPolicy,
    pub rollback_timeout_ms: Option<u64>,
    pub max_in_size: usize,
    pub log_serialization: LogSerialization,
}

impl Default for UndoConfig {
    fn default() -> Self {
        UndoConfig {
            dialect: DEFAULT_DIALECT.to_string(),
            data_validation: true,
            conflict_policy: ConflictPolicy::Abort,
            rollback_timeout_ms: None,
            max_in_size: DEFAULT_MAX_IN_SIZE,
            log_serialization: LogSerialization::Json,
        }
    }
}

impl UndoConfig {
    pub fn load(path: &Path) -> Result<Self, UndoError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| UndoError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, UndoError> {
        let config: UndoConfig =
            toml::from_str(contents).map_err(|e| UndoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UndoError> {
        if self.max_in_size == 0 {
            return Err(UndoError::Config("max_in_size must be positive".into()));
        }
        if self.dialect.trim().is_empty() {
            return Err(UndoError::Config("dialect must not be blank".into()));
        }
        Ok(())
    }

    pub fn rollback_timeout(&self) -> Option<Duration> {
        self.rollback_timeout_ms.map(Duration::from_millis)
    }
}
