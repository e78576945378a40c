use crate::types_db::type_id::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Val {
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Decimal(f64),
    Float(f32),
    Timestamp(u64),
    Date(i32),
    Time(i32),
    VarLen(String),
    ConstLen(String),
    Binary(Vec<u8>),
    JSON(String),
    UUID(String),
    Null,
}

/// A typed field value as captured in a row image or bound as a statement
/// parameter.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub value_: Val,
    pub type_id_: TypeId,
}

impl Value {
    pub fn new<T: Into<Val>>(value: T) -> Self {
        let val = value.into();
        let type_id = match &val {
            Val::Boolean(_) => TypeId::Boolean,
            Val::TinyInt(_) => TypeId::TinyInt,
            Val::SmallInt(_) => TypeId::SmallInt,
            Val::Integer(_) => TypeId::Integer,
            Val::BigInt(_) => TypeId::BigInt,
            Val::Decimal(_) => TypeId::Decimal,
            Val::Float(_) => TypeId::Float,
            Val::Timestamp(_) => TypeId::Timestamp,
            Val::Date(_) => TypeId::Date,
            Val::Time(_) => TypeId::Time,
            Val::VarLen(_) => TypeId::VarChar,
            Val::ConstLen(_) => TypeId::Char,
            Val::Binary(_) => TypeId::Binary,
            Val::JSON(_) => TypeId::JSON,
            Val::UUID(_) => TypeId::UUID,
            Val::Null => TypeId::Invalid,
        };
        Value {
            value_: val,
            type_id_: type_id,
        }
    }

    /// A NULL that still remembers the declared column type.
    pub fn null(type_id: TypeId) -> Self {
        Value {
            value_: Val::Null,
            type_id_: type_id,
        }
    }

    pub fn json(text: impl Into<String>) -> Self {
        Value::new(Val::JSON(text.into()))
    }

    pub fn get_val(&self) -> &Val {
        &self.value_
    }

    pub fn get_type_id(&self) -> TypeId {
        self.type_id_
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value_, Val::Null)
    }

    fn as_i64(&self) -> Option<i64> {
        match self.value_ {
            Val::Boolean(b) => Some(i64::from(b)),
            Val::TinyInt(i) => Some(i64::from(i)),
            Val::SmallInt(i) => Some(i64::from(i)),
            Val::Integer(i) => Some(i64::from(i)),
            Val::BigInt(i) => Some(i),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self.value_ {
            Val::Decimal(d) => Some(d),
            Val::Float(f) => Some(f64::from(f)),
            _ => self.as_i64().map(|i| i as f64),
        }
    }

    fn as_text(&self) -> Option<&str> {
        match &self.value_ {
            Val::VarLen(s) | Val::ConstLen(s) | Val::UUID(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Compares two captured values the way a database would see them.
    ///
    /// A driver may hand back a column with a different width than the one
    /// recorded at capture time (INTEGER vs BIGINT, FLOAT vs DECIMAL), so
    /// numbers compare by magnitude. JSON compares structurally.
    pub fn semantically_equals(&self, other: &Value) -> bool {
        match (&self.value_, &other.value_) {
            (Val::Null, Val::Null) => true,
            (Val::Null, _) | (_, Val::Null) => false,
            (Val::JSON(a), Val::JSON(b)) => json_equals(a, b),
            (Val::Binary(a), Val::Binary(b)) => a == b,
            (Val::Timestamp(a), Val::Timestamp(b)) => a == b,
            (Val::Date(a), Val::Date(b)) | (Val::Time(a), Val::Time(b)) => a == b,
            _ => {
                if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
                    return a == b;
                }
                if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
                    return a == b;
                }
                match (self.as_text(), other.as_text()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }
    }
}

fn json_equals(a: &str, b: &str) -> bool {
    match (
        serde_json::from_str::<serde_json::Value>(a),
        serde_json::from_str::<serde_json::Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Boolean(b)
    }
}

impl From<i8> for Val {
    fn from(i: i8) -> Self {
        Val::TinyInt(i)
    }
}

impl From<i16> for Val {
    fn from(i: i16) -> Self {
        Val::SmallInt(i)
    }
}

impl From<i32> for Val {
    fn from(i: i32) -> Self {
        Val::Integer(i)
    }
}

impl From<i64> for Val {
    fn from(i: i64) -> Self {
        Val::BigInt(i)
    }
}

impl From<f32> for Val {
    fn from(f: f32) -> Self {
        Val::Float(f)
    }
}

impl From<f64> for Val {
    fn from(f: f64) -> Self {
        Val::Decimal(f)
    }
}

impl From<u64> for Val {
    fn from(t: u64) -> Self {
        Val::Timestamp(t)
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::VarLen(s)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::VarLen(s.to_string())
    }
}

impl From<Vec<u8>> for Val {
    fn from(b: Vec<u8>) -> Self {
        Val::Binary(b)
    }
}

impl From<&[u8]> for Val {
    fn from(b: &[u8]) -> Self {
        Val::Binary(b.to_vec())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value_ {
            Val::Boolean(b) => write!(f, "{}", b),
            Val::TinyInt(i) => write!(f, "{}", i),
            Val::SmallInt(i) => write!(f, "{}", i),
            Val::Integer(i) => write!(f, "{}", i),
            Val::BigInt(i) => write!(f, "{}", i),
            Val::Decimal(d) => write!(f, "{}", d),
            Val::Float(fl) => write!(f, "{}", fl),
            Val::Timestamp(t) => write!(f, "{}", t),
            Val::Date(d) => write!(f, "DATE({})", d),
            Val::Time(t) => write!(f, "TIME({})", t),
            Val::VarLen(s) | Val::ConstLen(s) => write!(f, "{}", s),
            Val::Binary(b) => write!(f, "BINARY[{} bytes]", b.len()),
            Val::JSON(j) => write!(f, "{}", j),
            Val::UUID(u) => write!(f, "{}", u),
            Val::Null => write!(f, "NULL"),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}: {})", self.type_id_, self)
    }
}
