use crate::types_db::type_id::TypeId;
use crate::types_db::value::Value;
use serde::{Deserialize, Serialize};

/// Whether a captured field belongs to the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyType {
    #[default]
    Null,
    PrimaryKey,
}

/// One column value of a captured row. Immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    type_id: TypeId,
    value: Value,
    key_type: KeyType,
}

impl Field {
    pub fn new(name: &str, type_id: TypeId, value: Value) -> Self {
        Self {
            name: name.to_string(),
            type_id,
            value,
            key_type: KeyType::Null,
        }
    }

    /// A field whose declared type is taken from its value.
    pub fn of(name: &str, value: Value) -> Self {
        let type_id = value.get_type_id();
        Self::new(name, type_id, value)
    }

    pub fn primary_key(name: &str, value: Value) -> Self {
        Self {
            key_type: KeyType::PrimaryKey,
            ..Self::of(name, value)
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> TypeId {
        self.type_id
    }

    pub fn get_value(&self) -> &Value {
        &self.value
    }

    pub fn get_key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.key_type == KeyType::PrimaryKey
    }
}

/// A captured row. Field order is the column order reported by the driver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn get_fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields flagged as primary key at capture time, in column order.
    pub fn primary_keys(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.is_primary_key()).collect()
    }

    pub fn non_primary_keys(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| !f.is_primary_key()).collect()
    }

    /// Looks a field up by name; exact match first, then ASCII case-insensitive.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.get_field(name).map(Field::get_value)
    }
}
