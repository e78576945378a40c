pub mod generic;
pub mod identifier_policy;
pub mod mysql;
pub mod oracle;
pub mod oscar;
pub mod postgresql;
pub mod registry;
pub mod sqlserver;
