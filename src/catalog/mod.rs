pub mod column;
pub mod schema_cache;
pub mod table_meta;
