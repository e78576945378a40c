pub mod handler;
pub mod sql_builder;
