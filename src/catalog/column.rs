use crate::types_db::type_id::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Schema description of one column of a branch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    column_name: String,
    data_type: TypeId,
    case_sensitive: bool,
    nullable: bool,
}

impl ColumnMeta {
    pub fn new(column_name: &str, data_type: TypeId) -> Self {
        Self {
            column_name: column_name.to_string(),
            data_type,
            case_sensitive: false,
            nullable: true,
        }
    }

    /// A column whose name was declared quoted, so its exact case matters.
    pub fn new_case_sensitive(column_name: &str, data_type: TypeId) -> Self {
        Self {
            case_sensitive: true,
            ..Self::new(column_name, data_type)
        }
    }

    pub fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    pub fn get_name(&self) -> &str {
        &self.column_name
    }

    pub fn get_type(&self) -> TypeId {
        self.data_type
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl Display for ColumnMeta {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "Column(name: {}, type: {}, case_sensitive: {}, nullable: {})",
                self.column_name, self.data_type, self.case_sensitive, self.nullable
            )
        } else {
            write!(f, "{}({})", self.column_name, self.data_type)
        }
    }
}
