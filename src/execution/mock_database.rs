//! # Mock Database
//!
//! An in-memory database behind [`BranchConnection`], used to exercise undo
//! execution end to end without a real server.
//!
//! It understands exactly the statement shapes produced by
//! [`SqlBuilder`](crate::sql::sql_builder::SqlBuilder):
//!
//! ```text
//!   UPDATE t SET a = ?, ... WHERE k1 = ? AND k2 = ?
//!   INSERT INTO t (a, b, ...) VALUES (?, ?, ...)
//!   DELETE FROM t WHERE k1 = ? AND k2 = ?
//!   SELECT a, b | * FROM t WHERE k IN (?, ...) [OR k IN (...)]
//!   SELECT a, b | * FROM t WHERE (k1, k2) IN ((?, ?), ...) [OR ...]
//! ```
//!
//! Statements are tokenized with the SQL parser's tokenizer using the quoting
//! rules of the configured identifier policy, so a statement that quotes an
//! identifier incorrectly fails here the way it would on a real database.
//!
//! ## Transactions
//!
//! `begin` snapshots all tables into the connection and statements run
//! against the snapshot. `commit` publishes the tables the transaction wrote
//! to and `rollback` discards the snapshot. Statements issued outside a
//! transaction autocommit. Two transactions writing the same table do not
//! conflict; the last committer wins that table.

use crate::common::exception::DbError;
use crate::execution::connection::BranchConnection;
use crate::sql::handler::identifier_policy::{EscapeSymbol, IdentifierPolicy};
use crate::storage::table::row::{Field, Row};
use crate::types_db::type_id::TypeId;
use crate::types_db::value::Value;
use async_trait::async_trait;
use log::{debug, trace};
use parking_lot::Mutex;
use sqlparser::dialect::{Dialect, GenericDialect, MsSqlDialect, MySqlDialect};
use sqlparser::tokenizer::{Token, Tokenizer};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct MockTable {
    columns: Vec<String>,
    primary_key: Vec<usize>,
    rows: Vec<Vec<Value>>,
}

impl MockTable {
    fn column_index(&self, name: &str) -> Result<usize, DbError> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| DbError::Statement(format!("unknown column '{}'", name)))
    }

    fn matches(row: &[Value], filter: &[(usize, &Value)]) -> bool {
        filter
            .iter()
            .all(|(idx, value)| row[*idx].semantically_equals(value))
    }

    fn to_row(&self, values: &[Value], projection: &[usize]) -> Row {
        Row::new(
            projection
                .iter()
                .map(|&idx| Field::of(&self.columns[idx], values[idx].clone()))
                .collect(),
        )
    }
}

type Tables = HashMap<String, MockTable>;

#[derive(Debug, Default)]
struct MockState {
    tables: Tables,
    executed: Vec<String>,
    fail_pattern: Option<String>,
    statement_delay: Option<Duration>,
    commits: usize,
    rollbacks: usize,
}

/// Shared in-memory database. Clones share the same state.
#[derive(Debug, Clone)]
pub struct MockDatabase {
    state: Arc<Mutex<MockState>>,
    symbol: EscapeSymbol,
}

impl MockDatabase {
    pub fn new(policy: &dyn IdentifierPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            symbol: policy.escape_symbol(),
        }
    }

    pub fn connect(&self) -> MockConnection {
        MockConnection {
            db: self.clone(),
            working: None,
            written: HashSet::new(),
        }
    }

    pub fn create_table(&self, name: &str, columns: &[&str], primary_key: &[&str]) {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let primary_key = primary_key
            .iter()
            .filter_map(|pk| columns.iter().position(|c| c.eq_ignore_ascii_case(pk)))
            .collect();
        self.state.lock().tables.insert(
            Self::table_key(name),
            MockTable {
                columns,
                primary_key,
                rows: Vec::new(),
            },
        );
    }

    /// Inserts a row directly, bypassing SQL. Unlisted columns are NULL.
    pub fn insert_row(&self, table: &str, values: &[(&str, Value)]) -> Result<(), DbError> {
        let mut state = self.state.lock();
        let table = state
            .tables
            .get_mut(&Self::table_key(table))
            .ok_or_else(|| DbError::Statement(format!("unknown table '{}'", table)))?;
        let columns: Vec<String> = values.iter().map(|(c, _)| c.to_string()).collect();
        let params: Vec<Value> = values.iter().map(|(_, v)| v.clone()).collect();
        apply_insert(table, &columns, &params)?;
        Ok(())
    }

    /// Committed rows of `table`, all columns, in storage order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        let state = self.state.lock();
        match state.tables.get(&Self::table_key(table)) {
            Some(t) => {
                let all: Vec<usize> = (0..t.columns.len()).collect();
                t.rows.iter().map(|r| t.to_row(r, &all)).collect()
            }
            None => Vec::new(),
        }
    }

    /// Every statement executed so far, committed or not, in execution order.
    pub fn executed_statements(&self) -> Vec<String> {
        self.state.lock().executed.clone()
    }

    pub fn clear_executed_statements(&self) {
        self.state.lock().executed.clear();
    }

    /// The next statement containing `pattern` fails with a statement error.
    pub fn fail_statements_matching(&self, pattern: &str) {
        self.state.lock().fail_pattern = Some(pattern.to_string());
    }

    /// Every statement sleeps for `delay` before running.
    pub fn set_statement_delay(&self, delay: Duration) {
        self.state.lock().statement_delay = Some(delay);
    }

    pub fn commit_count(&self) -> usize {
        self.state.lock().commits
    }

    pub fn rollback_count(&self) -> usize {
        self.state.lock().rollbacks
    }

    fn table_key(name: &str) -> String {
        name.to_lowercase()
    }

    fn tokenize(&self, sql: &str) -> Result<Vec<Token>, DbError> {
        let dialect: Box<dyn Dialect> = match self.symbol.open {
            '[' => Box::new(MsSqlDialect {}),
            '`' => Box::new(MySqlDialect {}),
            _ => Box::new(GenericDialect {}),
        };
        let tokens = Tokenizer::new(dialect.as_ref(), sql)
            .tokenize()
            .map_err(|e| DbError::Statement(format!("cannot tokenize '{}': {}", sql, e)))?;
        Ok(tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
            .collect())
    }

    /// Checks the injected failure and records the statement.
    fn admit(&self, sql: &str) -> Result<(), DbError> {
        let mut state = self.state.lock();
        if let Some(pattern) = state.fail_pattern.clone() {
            if sql.contains(&pattern) {
                state.fail_pattern = None;
                return Err(DbError::Statement(format!("injected failure for '{}'", sql)));
            }
        }
        state.executed.push(sql.to_string());
        Ok(())
    }

    fn statement_delay(&self) -> Option<Duration> {
        self.state.lock().statement_delay
    }
}

#[derive(Debug)]
enum MockStatement {
    Update {
        table: String,
        set: Vec<String>,
        filter: Vec<String>,
    },
    Insert {
        table: String,
        columns: Vec<String>,
    },
    Delete {
        table: String,
        filter: Vec<String>,
    },
    Select {
        table: String,
        columns: Option<Vec<String>>,
        keys: Vec<String>,
        tuples: usize,
    },
}

impl MockStatement {
    fn placeholder_count(&self) -> usize {
        match self {
            MockStatement::Update { set, filter, .. } => set.len() + filter.len(),
            MockStatement::Insert { columns, .. } => columns.len(),
            MockStatement::Delete { filter, .. } => filter.len(),
            MockStatement::Select { keys, tuples, .. } => keys.len() * tuples,
        }
    }

    fn table(&self) -> &str {
        match self {
            MockStatement::Update { table, .. }
            | MockStatement::Insert { table, .. }
            | MockStatement::Delete { table, .. }
            | MockStatement::Select { table, .. } => table,
        }
    }
}

struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    fn error(&self, expected: &str) -> DbError {
        let found = self
            .tokens
            .get(self.pos)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "end of statement".to_string());
        DbError::Statement(format!("expected {}, found {}", expected, found))
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(
            self.tokens.get(self.pos),
            Some(Token::Word(w)) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(keyword)
        )
    }

    fn keyword(&mut self, keyword: &str) -> Result<(), DbError> {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(keyword))
        }
    }

    fn peek_punct(&self, punct: &str) -> bool {
        self.tokens
            .get(self.pos)
            .is_some_and(|t| t.to_string() == punct)
    }

    fn punct(&mut self, punct: &str) -> Result<(), DbError> {
        if self.peek_punct(punct) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(punct))
        }
    }

    fn placeholder(&mut self) -> Result<(), DbError> {
        match self.tokens.get(self.pos) {
            Some(t) if t.to_string().starts_with('?') => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error("placeholder")),
        }
    }

    fn ident(&mut self) -> Result<String, DbError> {
        let mut parts = Vec::new();
        loop {
            match self.tokens.get(self.pos) {
                Some(Token::Word(w)) => {
                    parts.push(w.value.clone());
                    self.pos += 1;
                }
                _ => return Err(self.error("identifier")),
            }
            if self.peek_punct(".") {
                self.pos += 1;
            } else {
                return Ok(parts.join("."));
            }
        }
    }

    fn ident_list(&mut self) -> Result<Vec<String>, DbError> {
        let mut idents = vec![self.ident()?];
        while self.peek_punct(",") {
            self.pos += 1;
            idents.push(self.ident()?);
        }
        Ok(idents)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// `k1 = ? AND k2 = ?`
    fn equality_filter(&mut self) -> Result<Vec<String>, DbError> {
        let mut columns = Vec::new();
        loop {
            columns.push(self.ident()?);
            self.punct("=")?;
            self.placeholder()?;
            if self.peek_keyword("AND") {
                self.pos += 1;
            } else {
                return Ok(columns);
            }
        }
    }

    /// `k IN (?, ?)` or `(k1, k2) IN ((?, ?), ...)`, possibly OR-ed.
    fn key_list_filter(&mut self) -> Result<(Vec<String>, usize), DbError> {
        let mut keys: Option<Vec<String>> = None;
        let mut tuples = 0;
        loop {
            let group_keys = if self.peek_punct("(") {
                self.pos += 1;
                let idents = self.ident_list()?;
                self.punct(")")?;
                idents
            } else {
                vec![self.ident()?]
            };
            self.keyword("IN")?;
            self.punct("(")?;
            loop {
                if group_keys.len() > 1 {
                    self.punct("(")?;
                    for i in 0..group_keys.len() {
                        if i > 0 {
                            self.punct(",")?;
                        }
                        self.placeholder()?;
                    }
                    self.punct(")")?;
                } else {
                    self.placeholder()?;
                }
                tuples += 1;
                if self.peek_punct(",") {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.punct(")")?;
            match &keys {
                Some(existing) if *existing != group_keys => {
                    return Err(DbError::Statement("mixed key columns across IN groups".into()));
                }
                Some(_) => {}
                None => keys = Some(group_keys),
            }
            if self.peek_keyword("OR") {
                self.pos += 1;
            } else {
                return Ok((keys.unwrap_or_default(), tuples));
            }
        }
    }

    fn statement(&mut self) -> Result<MockStatement, DbError> {
        let statement = if self.peek_keyword("UPDATE") {
            self.pos += 1;
            let table = self.ident()?;
            self.keyword("SET")?;
            let mut set = Vec::new();
            loop {
                set.push(self.ident()?);
                self.punct("=")?;
                self.placeholder()?;
                if self.peek_punct(",") {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.keyword("WHERE")?;
            let filter = self.equality_filter()?;
            MockStatement::Update { table, set, filter }
        } else if self.peek_keyword("INSERT") {
            self.pos += 1;
            self.keyword("INTO")?;
            let table = self.ident()?;
            self.punct("(")?;
            let columns = self.ident_list()?;
            self.punct(")")?;
            self.keyword("VALUES")?;
            self.punct("(")?;
            for i in 0..columns.len() {
                if i > 0 {
                    self.punct(",")?;
                }
                self.placeholder()?;
            }
            self.punct(")")?;
            MockStatement::Insert { table, columns }
        } else if self.peek_keyword("DELETE") {
            self.pos += 1;
            self.keyword("FROM")?;
            let table = self.ident()?;
            self.keyword("WHERE")?;
            let filter = self.equality_filter()?;
            MockStatement::Delete { table, filter }
        } else if self.peek_keyword("SELECT") {
            self.pos += 1;
            let columns = if self.peek_punct("*") {
                self.pos += 1;
                None
            } else {
                Some(self.ident_list()?)
            };
            self.keyword("FROM")?;
            let table = self.ident()?;
            self.keyword("WHERE")?;
            let (keys, tuples) = self.key_list_filter()?;
            MockStatement::Select {
                table,
                columns,
                keys,
                tuples,
            }
        } else {
            return Err(self.error("UPDATE, INSERT, DELETE or SELECT"));
        };
        if !self.at_end() {
            return Err(self.error("end of statement"));
        }
        Ok(statement)
    }
}

fn resolve_filter<'v>(
    table: &MockTable,
    columns: &[String],
    params: &'v [Value],
) -> Result<Vec<(usize, &'v Value)>, DbError> {
    columns
        .iter()
        .zip(params.iter())
        .map(|(c, v)| Ok((table.column_index(c)?, v)))
        .collect()
}

fn apply_insert(table: &mut MockTable, columns: &[String], params: &[Value]) -> Result<u64, DbError> {
    let mut row = vec![Value::null(TypeId::Invalid); table.columns.len()];
    for (column, value) in columns.iter().zip(params.iter()) {
        row[table.column_index(column)?] = value.clone();
    }
    if !table.primary_key.is_empty() {
        let key: Vec<(usize, &Value)> = table.primary_key.iter().map(|&i| (i, &row[i])).collect();
        if table.rows.iter().any(|r| MockTable::matches(r, &key)) {
            return Err(DbError::Statement(format!(
                "duplicate primary key in table with columns {:?}",
                table.columns
            )));
        }
    }
    table.rows.push(row);
    Ok(1)
}

fn apply(tables: &mut Tables, statement: &MockStatement, params: &[Value]) -> Result<(u64, Vec<Row>), DbError> {
    let table = tables
        .get_mut(&MockDatabase::table_key(statement.table()))
        .ok_or_else(|| DbError::Statement(format!("unknown table '{}'", statement.table())))?;

    match statement {
        MockStatement::Update { set, filter, .. } => {
            let (set_params, filter_params) = params.split_at(set.len());
            let targets: Vec<usize> = set
                .iter()
                .map(|c| table.column_index(c))
                .collect::<Result<_, _>>()?;
            let filter = resolve_filter(table, filter, filter_params)?;
            let mut affected = 0;
            for row in table.rows.iter_mut() {
                if MockTable::matches(row, &filter) {
                    for (idx, value) in targets.iter().zip(set_params.iter()) {
                        row[*idx] = value.clone();
                    }
                    affected += 1;
                }
            }
            Ok((affected, Vec::new()))
        }
        MockStatement::Insert { columns, .. } => Ok((apply_insert(table, columns, params)?, Vec::new())),
        MockStatement::Delete { filter, .. } => {
            let filter = resolve_filter(table, filter, params)?;
            let before = table.rows.len();
            table.rows.retain(|row| !MockTable::matches(row, &filter));
            Ok(((before - table.rows.len()) as u64, Vec::new()))
        }
        MockStatement::Select { columns, keys, .. } => {
            let projection: Vec<usize> = match columns {
                Some(cols) => cols
                    .iter()
                    .map(|c| table.column_index(c))
                    .collect::<Result<_, _>>()?,
                None => (0..table.columns.len()).collect(),
            };
            let mut rows = Vec::new();
            for key in params.chunks(keys.len().max(1)) {
                let filter = resolve_filter(table, keys, key)?;
                rows.extend(
                    table
                        .rows
                        .iter()
                        .filter(|r| MockTable::matches(r, &filter))
                        .map(|r| table.to_row(r, &projection)),
                );
            }
            Ok((rows.len() as u64, rows))
        }
    }
}

/// A connection to a [`MockDatabase`].
#[derive(Debug)]
pub struct MockConnection {
    db: MockDatabase,
    working: Option<Tables>,
    written: HashSet<String>,
}

impl MockConnection {
    pub fn in_transaction(&self) -> bool {
        self.working.is_some()
    }

    async fn run(&mut self, sql: &str, params: &[Value]) -> Result<(u64, Vec<Row>), DbError> {
        if let Some(delay) = self.db.statement_delay() {
            tokio::time::sleep(delay).await;
        }

        let tokens = self.db.tokenize(sql)?;
        let statement = TokenCursor { tokens, pos: 0 }.statement()?;
        if statement.placeholder_count() != params.len() {
            return Err(DbError::Statement(format!(
                "statement has {} placeholders but {} parameters were bound",
                statement.placeholder_count(),
                params.len()
            )));
        }
        self.db.admit(sql)?;
        trace!("mock executing {:?} with {:?}", statement, params);

        match self.working.as_mut() {
            Some(tables) => {
                if !matches!(statement, MockStatement::Select { .. }) {
                    self.written.insert(MockDatabase::table_key(statement.table()));
                }
                apply(tables, &statement, params)
            }
            None => {
                let mut state = self.db.state.lock();
                apply(&mut state.tables, &statement, params)
            }
        }
    }
}

#[async_trait]
impl BranchConnection for MockConnection {
    async fn begin(&mut self) -> Result<(), DbError> {
        if self.working.is_some() {
            return Err(DbError::Transaction("transaction already open".into()));
        }
        self.working = Some(self.db.state.lock().tables.clone());
        debug!("mock transaction started");
        Ok(())
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        Ok(self.run(sql, params).await?.0)
    }

    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DbError> {
        Ok(self.run(sql, params).await?.1)
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        let mut tables = self
            .working
            .take()
            .ok_or_else(|| DbError::Transaction("no open transaction".into()))?;
        let mut state = self.db.state.lock();
        for key in self.written.drain() {
            if let Some(table) = tables.remove(&key) {
                state.tables.insert(key, table);
            }
        }
        state.commits += 1;
        debug!("mock transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.written.clear();
        if self.working.take().is_some() {
            self.db.state.lock().rollbacks += 1;
            debug!("mock transaction rolled back");
        }
        Ok(())
    }
}
