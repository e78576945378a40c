use crate::catalog::table_meta::TableMeta;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup of table schemas by table name.
pub trait SchemaCache: Send + Sync {
    fn table_meta(&self, table_name: &str) -> Option<Arc<TableMeta>>;
}

/// Process-local schema cache.
///
/// Names are keyed without quote characters and lower-cased, so `"ORDERS"`,
/// `` `orders` `` and `Orders` resolve to the same entry. Schema-qualified names
/// keep their qualifier.
#[derive(Debug, Default)]
pub struct MemorySchemaCache {
    tables: RwLock<HashMap<String, Arc<TableMeta>>>,
}

impl MemorySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, meta: TableMeta) {
        let key = Self::cache_key(meta.get_table_name());
        debug!("Registering table meta for '{}'", key);
        self.tables.write().insert(key, Arc::new(meta));
    }

    pub fn invalidate(&self, table_name: &str) {
        self.tables.write().remove(&Self::cache_key(table_name));
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    fn cache_key(table_name: &str) -> String {
        table_name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '"' | '`' | '[' | ']'))
            .collect::<String>()
            .to_lowercase()
    }
}

impl SchemaCache for MemorySchemaCache {
    fn table_meta(&self, table_name: &str) -> Option<Arc<TableMeta>> {
        self.tables.read().get(&Self::cache_key(table_name)).cloned()
    }
}
