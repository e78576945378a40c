//! Oracle identifier rules (reserved words per the SQL Language Reference).

use crate::sql::handler::identifier_policy::{CaseFolding, EscapeSymbol, IdentifierPolicy, KeywordSet};
use std::sync::LazyLock;

static ORACLE_KEYWORDS: &[&str] = &[
    "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY",
    "CHAR", "CHECK", "CLUSTER", "COLUMN", "COLUMN_VALUE", "COMMENT", "COMPRESS", "CONNECT",
    "CREATE", "CURRENT", "DATE", "DECIMAL", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP",
    "ELSE", "EXCLUSIVE", "EXISTS", "FILE", "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING",
    "IDENTIFIED", "IMMEDIATE", "IN", "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER",
    "INTERSECT", "INTO", "IS", "LEVEL", "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS",
    "MLSLABEL", "MODE", "MODIFY", "NESTED_TABLE_ID", "NOAUDIT", "NOCOMPRESS", "NOT", "NOWAIT",
    "NULL", "NUMBER", "OF", "OFFLINE", "ON", "ONLINE", "OPTION", "OR", "ORDER", "PCTFREE",
    "PRIOR", "PUBLIC", "RAW", "RENAME", "RESOURCE", "REVOKE", "ROW", "ROWID", "ROWNUM", "ROWS",
    "SELECT", "SESSION", "SET", "SHARE", "SIZE", "SMALLINT", "START", "SUCCESSFUL", "SYNONYM",
    "SYSDATE", "TABLE", "THEN", "TO", "TRIGGER", "UID", "UNION", "UNIQUE", "UPDATE", "USER",
    "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER", "WHERE", "WITH",
];

static KEYWORDS: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(ORACLE_KEYWORDS));

#[derive(Debug, Default, Clone, Copy)]
pub struct OracleIdentifierPolicy;

impl IdentifierPolicy for OracleIdentifierPolicy {
    fn dialect(&self) -> &'static str {
        "oracle"
    }

    fn escape_symbol(&self) -> EscapeSymbol {
        EscapeSymbol::DOUBLE_QUOTE
    }

    fn case_folding(&self) -> CaseFolding {
        CaseFolding::Upper
    }

    fn keywords(&self) -> &KeywordSet {
        &KEYWORDS
    }
}
