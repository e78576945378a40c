use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic SQL type of a captured field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeId {
    #[default]
    Invalid = 0,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    Timestamp,
    Date,
    Time,
    VarChar,
    Char,
    Binary,
    JSON,
    UUID,
}

impl TypeId {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeId::TinyInt
                | TypeId::SmallInt
                | TypeId::Integer
                | TypeId::BigInt
                | TypeId::Decimal
                | TypeId::Float
        )
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            TypeId::VarChar | TypeId::Char | TypeId::JSON | TypeId::UUID
        )
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeId::Invalid => "INVALID",
            TypeId::Boolean => "BOOLEAN",
            TypeId::TinyInt => "TINYINT",
            TypeId::SmallInt => "SMALLINT",
            TypeId::Integer => "INTEGER",
            TypeId::BigInt => "BIGINT",
            TypeId::Decimal => "DECIMAL",
            TypeId::Float => "FLOAT",
            TypeId::Timestamp => "TIMESTAMP",
            TypeId::Date => "DATE",
            TypeId::Time => "TIME",
            TypeId::VarChar => "VARCHAR",
            TypeId::Char => "CHAR",
            TypeId::Binary => "BINARY",
            TypeId::JSON => "JSON",
            TypeId::UUID => "UUID",
        };
        write!(f, "{}", name)
    }
}
