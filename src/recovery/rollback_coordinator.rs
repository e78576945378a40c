//! # Rollback Coordinator
//!
//! Rolls back one branch transaction as a single local transaction.
//!
//! ```text
//!   find_branch_log(xid, branch) ── none ──► Applied (nothing to undo)
//!            │
//!          begin
//!            │
//!   for entry in log, newest first:
//!       UndoExecutor::execute ── error ──► rollback ──► Conflict | Fatal | Retryable
//!            │
//!          commit
//!            │
//!   delete_branch_log(xid, branch)
//!            │
//!         Applied(summary)
//! ```
//!
//! An optional deadline covers the whole sequence. When it expires the local
//! transaction is rolled back and the outcome is `Retryable(Timeout)`; a
//! partial compensation is never committed.
//!
//! Branches are independent: a coordinator holds no per-branch state, so any
//! number of branches may be rolled back concurrently as long as each uses its
//! own connection.

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::catalog::schema_cache::SchemaCache;
use crate::common::config::{BranchId, ConflictPolicy, UndoConfig};
use crate::common::exception::{ErrorClass, UndoError};
use crate::execution::connection::BranchConnection;
use crate::recovery::undo::undo_executor::{UndoEntryState, UndoExecutor};
use crate::recovery::undo_log_store::UndoLogStore;
use crate::sql::handler::identifier_policy::IdentifierPolicy;
use crate::sql::handler::registry::DialectRegistry;

/// Counters of a successful branch rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollbackSummary {
    pub entries_applied: usize,
    pub entries_skipped: usize,
    pub statements_executed: usize,
    pub rows_skipped: usize,
}

/// Result of rolling back one branch, as reported to the transaction
/// coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum RollbackOutcome {
    /// All compensation committed and the undo log removed.
    Applied(RollbackSummary),
    /// A dirty write blocked compensation; nothing was committed.
    Conflict(UndoError),
    /// The undo log cannot be compensated; retrying will not help.
    Fatal(UndoError),
    /// Deadline expiry or a transient database/store failure.
    Retryable(UndoError),
}

impl RollbackOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RollbackOutcome::Applied(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RollbackOutcome::Conflict(_) | RollbackOutcome::Retryable(_)
        )
    }

    pub fn summary(&self) -> Option<&RollbackSummary> {
        match self {
            RollbackOutcome::Applied(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&UndoError> {
        match self {
            RollbackOutcome::Applied(_) => None,
            RollbackOutcome::Conflict(e)
            | RollbackOutcome::Fatal(e)
            | RollbackOutcome::Retryable(e) => Some(e),
        }
    }
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackOutcome::Applied(s) => write!(
                f,
                "APPLIED ({} entries applied, {} skipped, {} statements)",
                s.entries_applied, s.entries_skipped, s.statements_executed
            ),
            RollbackOutcome::Conflict(e) => write!(f, "CONFLICT: {}", e),
            RollbackOutcome::Fatal(e) => write!(f, "FATAL: {}", e),
            RollbackOutcome::Retryable(e) => write!(f, "RETRYABLE: {}", e),
        }
    }
}

/// Receives every branch outcome, e.g. to report it to the transaction
/// coordinator.
pub trait RollbackListener: Send + Sync {
    fn on_branch_outcome(&self, xid: &str, branch_id: BranchId, outcome: &RollbackOutcome);
}

pub struct RollbackCoordinator {
    registry: Arc<DialectRegistry>,
    store: Arc<dyn UndoLogStore>,
    schema_cache: Arc<dyn SchemaCache>,
    config: UndoConfig,
    listener: Option<Arc<dyn RollbackListener>>,
}

impl RollbackCoordinator {
    pub fn new(
        registry: Arc<DialectRegistry>,
        store: Arc<dyn UndoLogStore>,
        schema_cache: Arc<dyn SchemaCache>,
        config: UndoConfig,
    ) -> Self {
        Self {
            registry,
            store,
            schema_cache,
            config,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn RollbackListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn get_config(&self) -> &UndoConfig {
        &self.config
    }

    /// Rolls back a branch whose database speaks the configured dialect.
    pub async fn rollback_branch<C>(
        &self,
        xid: &str,
        branch_id: BranchId,
        conn: &mut C,
    ) -> RollbackOutcome
    where
        C: BranchConnection + ?Sized,
    {
        let dialect = self.config.dialect.clone();
        self.rollback_branch_with_dialect(xid, branch_id, &dialect, conn)
            .await
    }

    /// Rolls back a branch against a database of the given dialect.
    pub async fn rollback_branch_with_dialect<C>(
        &self,
        xid: &str,
        branch_id: BranchId,
        dialect: &str,
        conn: &mut C,
    ) -> RollbackOutcome
    where
        C: BranchConnection + ?Sized,
    {
        info!("Rolling back branch {} of {}", branch_id, xid);

        let result = match self.registry.get(dialect) {
            Ok(policy) => self.run_with_deadline(xid, branch_id, policy.as_ref(), conn).await,
            Err(e) => Err(e),
        };
        let outcome = self.outcome_of(result);

        match &outcome {
            RollbackOutcome::Applied(_) => info!("Branch {} of {}: {}", branch_id, xid, outcome),
            RollbackOutcome::Fatal(_) => error!("Branch {} of {}: {}", branch_id, xid, outcome),
            _ => warn!("Branch {} of {}: {}", branch_id, xid, outcome),
        }
        if let Some(listener) = &self.listener {
            listener.on_branch_outcome(xid, branch_id, &outcome);
        }
        outcome
    }

    async fn run_with_deadline<C>(
        &self,
        xid: &str,
        branch_id: BranchId,
        policy: &dyn IdentifierPolicy,
        conn: &mut C,
    ) -> Result<RollbackSummary, UndoError>
    where
        C: BranchConnection + ?Sized,
    {
        let Some(deadline) = self.config.rollback_timeout() else {
            return self.run_branch(xid, branch_id, policy, conn).await;
        };

        match tokio::time::timeout(deadline, self.run_branch(xid, branch_id, policy, &mut *conn)).await {
            Ok(result) => result,
            Err(_) => {
                if let Err(e) = conn.rollback().await {
                    warn!("Rollback after deadline expiry failed: {}", e);
                }
                Err(UndoError::Timeout(deadline))
            }
        }
    }

    async fn run_branch<C>(
        &self,
        xid: &str,
        branch_id: BranchId,
        policy: &dyn IdentifierPolicy,
        conn: &mut C,
    ) -> Result<RollbackSummary, UndoError>
    where
        C: BranchConnection + ?Sized,
    {
        let log = match self.store.find_branch_log(xid, branch_id).await? {
            Some(log) => log,
            None => {
                info!("No undo log for branch {} of {}", branch_id, xid);
                return Ok(RollbackSummary::default());
            }
        };
        if log.is_empty() {
            self.store.delete_branch_log(xid, branch_id).await?;
            return Ok(RollbackSummary::default());
        }
        debug!(
            "Branch {} of {} has {} undo entries",
            branch_id,
            xid,
            log.len()
        );

        conn.begin().await?;
        let executor = UndoExecutor::new(policy, &self.config);
        let mut summary = RollbackSummary::default();

        for entry in log.undo_order() {
            let meta = self.schema_cache.table_meta(entry.get_table_name());
            match executor.execute(&mut *conn, entry, meta.as_deref()).await {
                Ok(report) => {
                    match report.state {
                        UndoEntryState::Skipped => summary.entries_skipped += 1,
                        _ => summary.entries_applied += 1,
                    }
                    summary.statements_executed += report.statements_executed;
                    summary.rows_skipped += report.rows_skipped;
                }
                Err(e) => {
                    if let Err(rollback_err) = conn.rollback().await {
                        warn!(
                            "Local rollback of branch {} failed after {}: {}",
                            branch_id, e, rollback_err
                        );
                    }
                    return Err(e);
                }
            }
        }

        if let Err(e) = conn.commit().await {
            if let Err(rollback_err) = conn.rollback().await {
                warn!("Local rollback of branch {} failed: {}", branch_id, rollback_err);
            }
            return Err(e.into());
        }

        // Compensation is committed. If the delete fails the log stays behind
        // and a retry sees the compensated rows as already undone.
        self.store.delete_branch_log(xid, branch_id).await?;
        Ok(summary)
    }

    fn outcome_of(&self, result: Result<RollbackSummary, UndoError>) -> RollbackOutcome {
        match result {
            Ok(summary) => RollbackOutcome::Applied(summary),
            Err(e) => match e.class() {
                ErrorClass::Fatal => RollbackOutcome::Fatal(e),
                ErrorClass::Conflict if self.config.conflict_policy == ConflictPolicy::Escalate => {
                    RollbackOutcome::Fatal(e)
                }
                ErrorClass::Conflict => RollbackOutcome::Conflict(e),
                ErrorClass::Retryable => RollbackOutcome::Retryable(e),
            },
        }
    }
}
