pub mod rollback_coordinator;
pub mod undo;
pub mod undo_log;
pub mod undo_log_codec;
pub mod undo_log_store;
