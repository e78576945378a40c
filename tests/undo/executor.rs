use at_rollback::common::config::{ConflictPolicy, UndoConfig};
use at_rollback::common::exception::UndoError;
use at_rollback::execution::connection::BranchConnection;
use at_rollback::execution::mock_database::MockDatabase;
use at_rollback::recovery::undo::undo_executor::{UndoEntryState, UndoExecutor};
use at_rollback::sql::handler::mysql::MySqlIdentifierPolicy;
use at_rollback::storage::table::row::Row;
use at_rollback::types_db::value::Value;

use crate::common::fixtures::{account, col, delete_entry, insert_entry, pk, update_entry};
use crate::common::logger::init_test_logger;

fn accounts_db(rows: &[(i32, &str)]) -> MockDatabase {
    let db = MockDatabase::new(&MySqlIdentifierPolicy);
    db.create_table("t", &["id", "name"], &["id"]);
    for (id, name) in rows {
        assert_ok!(db.insert_row("t", &[("id", Value::new(*id)), ("name", Value::new(*name))]));
    }
    db
}

fn non_select(db: &MockDatabase) -> Vec<String> {
    db.executed_statements()
        .into_iter()
        .filter(|sql| !sql.starts_with("SELECT"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn conflicting_row_blocks_the_statement() {
    init_test_logger();
    let db = accounts_db(&[(1, "c")]);
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = update_entry(1, vec![account(1, "a")], vec![account(1, "b")]);
    let err = assert_err!(executor.execute(&mut conn, &entry, None).await);
    match err {
        UndoError::DirtyWrite { table, key, detail } => {
            assert_eq!(table, "t");
            assert_eq!(key, "1");
            assert!(detail.contains("name"), "{}", detail);
        }
        other => panic!("expected dirty write, got {:?}", other),
    }
    assert!(non_select(&db).is_empty());

    let entry = insert_entry(1, vec![account(1, "b")]);
    assert!(assert_err!(executor.execute(&mut conn, &entry, None).await).is_conflict());
    assert!(non_select(&db).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn matching_row_is_compensated() {
    init_test_logger();
    let db = accounts_db(&[(1, "b")]);
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = update_entry(1, vec![account(1, "a")], vec![account(1, "b")]);
    let report = assert_ok!(executor.execute(&mut conn, &entry, None).await);
    assert_eq!(report.state, UndoEntryState::Applied);
    assert_eq!(report.statements_executed, 1);
    assert_ok!(conn.commit().await);

    assert_eq!(db.rows("t")[0].get_value("name"), Some(&Value::new("a")));
    assert_eq!(
        db.executed_statements(),
        vec![
            "SELECT id, name FROM t WHERE id IN (?)".to_string(),
            "UPDATE t SET name = ? WHERE id = ?".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn compensated_rows_are_skipped() {
    init_test_logger();
    let db = accounts_db(&[(1, "a")]);
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let update = update_entry(1, vec![account(1, "a")], vec![account(1, "b")]);
    let report = assert_ok!(executor.execute(&mut conn, &update, None).await);
    assert_eq!(report.state, UndoEntryState::Skipped);
    assert_eq!(report.rows_skipped, 1);

    let insert = insert_entry(1, vec![account(9, "gone")]);
    let report = assert_ok!(executor.execute(&mut conn, &insert, None).await);
    assert_eq!(report.state, UndoEntryState::Skipped);

    let delete = delete_entry(1, vec![account(1, "a")]);
    let report = assert_ok!(executor.execute(&mut conn, &delete, None).await);
    assert_eq!(report.state, UndoEntryState::Skipped);

    assert!(non_select(&db).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn identical_images_skip_without_reading() {
    init_test_logger();
    let db = accounts_db(&[(1, "a")]);
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = update_entry(1, vec![account(1, "a")], vec![account(1, "a")]);
    let report = assert_ok!(executor.execute(&mut conn, &entry, None).await);
    assert_eq!(report.state, UndoEntryState::Skipped);
    assert_eq!(report.statements_executed, 0);
    assert!(db.executed_statements().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn skip_row_policy_compensates_the_rest() {
    init_test_logger();
    let db = accounts_db(&[(1, "b1"), (2, "changed"), (3, "b3")]);
    let config = UndoConfig {
        conflict_policy: ConflictPolicy::SkipRow,
        max_in_size: 2,
        ..UndoConfig::default()
    };
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = update_entry(
        1,
        vec![account(1, "a1"), account(2, "a2"), account(3, "a3")],
        vec![account(1, "b1"), account(2, "b2"), account(3, "b3")],
    );
    let report = assert_ok!(executor.execute(&mut conn, &entry, None).await);
    assert_eq!(report.state, UndoEntryState::Applied);
    assert_eq!(report.statements_executed, 2);
    assert_eq!(report.rows_skipped, 1);
    assert_ok!(conn.commit().await);

    let names: Vec<String> = db
        .rows("t")
        .iter()
        .filter_map(|r| r.get_value("name").map(|v| v.to_string()))
        .collect();
    assert_eq!(names, vec!["a1", "changed", "a3"]);
    assert_eq!(
        db.executed_statements()[0],
        "SELECT id, name FROM t WHERE id IN (?, ?) OR id IN (?)"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn validation_can_be_disabled() {
    init_test_logger();
    let db = accounts_db(&[(1, "c")]);
    let config = UndoConfig {
        data_validation: false,
        ..UndoConfig::default()
    };
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = update_entry(1, vec![account(1, "a")], vec![account(1, "b")]);
    let report = assert_ok!(executor.execute(&mut conn, &entry, None).await);
    assert_eq!(report.state, UndoEntryState::Applied);
    assert_ok!(conn.commit().await);

    assert_eq!(db.rows("t")[0].get_value("name"), Some(&Value::new("a")));
    assert_eq!(db.executed_statements().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reinserted_row_conflicts_with_delete_undo() {
    init_test_logger();
    let db = accounts_db(&[(1, "someone else")]);
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let entry = delete_entry(1, vec![account(1, "a")]);
    let err = assert_err!(executor.execute(&mut conn, &entry, None).await);
    assert!(err.is_conflict());
    assert!(non_select(&db).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn columns_only_in_the_after_image_are_read_back() {
    init_test_logger();
    let db = MockDatabase::new(&MySqlIdentifierPolicy);
    db.create_table("t", &["id", "name", "updated_by"], &["id"]);
    assert_ok!(db.insert_row(
        "t",
        &[
            ("id", Value::new(1)),
            ("name", Value::new("b")),
            ("updated_by", Value::new("svc")),
        ]
    ));
    let config = UndoConfig::default();
    let executor = UndoExecutor::new(&MySqlIdentifierPolicy, &config);
    let mut conn = db.connect();
    assert_ok!(conn.begin().await);

    let after = Row::new(vec![pk("id", 1), col("name", "b"), col("updated_by", "svc")]);
    let entry = update_entry(1, vec![account(1, "a")], vec![after]);
    let report = assert_ok!(executor.execute(&mut conn, &entry, None).await);
    assert_eq!(report.state, UndoEntryState::Applied);
    assert_eq!(
        db.executed_statements(),
        vec![
            "SELECT id, name, updated_by FROM t WHERE id IN (?)".to_string(),
            "UPDATE t SET name = ? WHERE id = ?".to_string(),
        ]
    );
}
