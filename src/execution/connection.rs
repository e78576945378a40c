use crate::common::exception::DbError;
use crate::storage::table::row::Row;
use crate::types_db::value::Value;
use async_trait::async_trait;

/// A connection to the database a branch transaction ran against.
///
/// One rollback owns one connection for its whole duration; every statement
/// runs inside the transaction opened by [`begin`](Self::begin). Statements
/// use `?` placeholders bound positionally from `params`.
#[async_trait]
pub trait BranchConnection: Send {
    async fn begin(&mut self) -> Result<(), DbError>;

    /// Executes a DML statement and returns the number of affected rows.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError>;

    /// Runs a query and returns its rows with column names as reported by the
    /// database. Primary-key flags of the returned fields are not meaningful.
    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError>;

    async fn commit(&mut self) -> Result<(), DbError>;

    async fn rollback(&mut self) -> Result<(), DbError>;
}
