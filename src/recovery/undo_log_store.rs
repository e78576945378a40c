use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;

use crate::common::config::BranchId;
use crate::common::exception::UndoError;
use crate::recovery::undo_log::BranchUndoLog;
use crate::recovery::undo_log_codec::UndoLogCodec;

/// Persistent home of branch undo logs, keyed by global transaction id and
/// branch id.
#[async_trait]
pub trait UndoLogStore: Send + Sync {
    /// `None` if the branch never wrote an undo log or it was already deleted.
    async fn find_branch_log(
        &self,
        xid: &str,
        branch_id: BranchId,
    ) -> Result<Option<BranchUndoLog>, UndoError>;

    /// Removes the branch's undo log. Deleting a missing log is not an error.
    async fn delete_branch_log(&self, xid: &str, branch_id: BranchId) -> Result<(), UndoError>;
}

/// Store holding encoded logs in memory.
#[derive(Debug, Default)]
pub struct MemoryUndoLogStore {
    codec: UndoLogCodec,
    logs: RwLock<HashMap<(String, BranchId), Vec<u8>>>,
}

impl MemoryUndoLogStore {
    pub fn new(codec: UndoLogCodec) -> Self {
        Self {
            codec,
            logs: RwLock::new(HashMap::new()),
        }
    }

    /// Encodes and stores `log`, replacing any earlier log of the same branch.
    pub fn insert(&self, log: &BranchUndoLog) -> Result<(), UndoError> {
        let bytes = self.codec.encode(log)?;
        debug!(
            "Storing undo log of branch {} ({} entries, {} bytes)",
            log.get_branch_id(),
            log.len(),
            bytes.len()
        );
        self.logs
            .write()
            .insert((log.get_xid().to_string(), log.get_branch_id()), bytes);
        Ok(())
    }

    /// Stores raw bytes as they would come back from a backing table.
    pub fn insert_raw(&self, xid: &str, branch_id: BranchId, bytes: Vec<u8>) {
        self.logs.write().insert((xid.to_string(), branch_id), bytes);
    }

    pub fn contains(&self, xid: &str, branch_id: BranchId) -> bool {
        self.logs.read().contains_key(&(xid.to_string(), branch_id))
    }

    pub fn len(&self) -> usize {
        self.logs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.read().is_empty()
    }
}

#[async_trait]
impl UndoLogStore for MemoryUndoLogStore {
    async fn find_branch_log(
        &self,
        xid: &str,
        branch_id: BranchId,
    ) -> Result<Option<BranchUndoLog>, UndoError> {
        let bytes = self.logs.read().get(&(xid.to_string(), branch_id)).cloned();
        bytes.map(|b| self.codec.decode(&b)).transpose()
    }

    async fn delete_branch_log(&self, xid: &str, branch_id: BranchId) -> Result<(), UndoError> {
        self.logs.write().remove(&(xid.to_string(), branch_id));
        Ok(())
    }
}
