use crate::common::exception::UndoError;
use crate::sql::handler::generic::GenericIdentifierPolicy;
use crate::sql::handler::identifier_policy::IdentifierPolicy;
use crate::sql::handler::mysql::MySqlIdentifierPolicy;
use crate::sql::handler::oracle::OracleIdentifierPolicy;
use crate::sql::handler::oscar::OscarIdentifierPolicy;
use crate::sql::handler::postgresql::PostgresIdentifierPolicy;
use crate::sql::handler::sqlserver::SqlServerIdentifierPolicy;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps dialect ids (and aliases) to their identifier policy.
///
/// Built once at startup and handed to the rollback engine by reference;
/// lookups are case-insensitive.
#[derive(Debug, Default, Clone)]
pub struct DialectRegistry {
    policies: HashMap<String, Arc<dyn IdentifierPolicy>>,
    aliases: HashMap<String, String>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_dialects() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OscarIdentifierPolicy));
        registry.register(Arc::new(OracleIdentifierPolicy));
        registry.register(Arc::new(PostgresIdentifierPolicy));
        registry.register(Arc::new(MySqlIdentifierPolicy));
        registry.register(Arc::new(SqlServerIdentifierPolicy));
        registry.register(Arc::new(GenericIdentifierPolicy));

        for (alias, dialect) in [
            ("postgres", "postgresql"),
            ("pg", "postgresql"),
            ("mariadb", "mysql"),
            ("mssql", "sqlserver"),
            ("ansi", "generic"),
        ] {
            registry
                .aliases
                .insert(alias.to_string(), dialect.to_string());
        }
        registry
    }

    /// Registers `policy` under its own dialect id, replacing any previous one.
    pub fn register(&mut self, policy: Arc<dyn IdentifierPolicy>) {
        let id = policy.dialect().to_lowercase();
        debug!("Registering identifier policy for dialect '{}'", id);
        self.policies.insert(id, policy);
    }

    pub fn register_alias(&mut self, alias: &str, dialect: &str) -> Result<(), UndoError> {
        let dialect = dialect.to_lowercase();
        if !self.policies.contains_key(&dialect) {
            return Err(UndoError::UnknownDialect(dialect));
        }
        self.aliases.insert(alias.to_lowercase(), dialect);
        Ok(())
    }

    pub fn get(&self, dialect: &str) -> Result<Arc<dyn IdentifierPolicy>, UndoError> {
        let key = dialect.trim().to_lowercase();
        let key = self.aliases.get(&key).cloned().unwrap_or(key);
        self.policies
            .get(&key)
            .cloned()
            .ok_or_else(|| UndoError::UnknownDialect(dialect.to_string()))
    }

    /// Registered dialect ids, sorted.
    pub fn dialects(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
