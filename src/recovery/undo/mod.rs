pub mod data_validation;
pub mod delete_undo;
pub mod insert_undo;
pub mod undo_executor;
pub mod update_undo;
