use std::sync::Arc;

use at_rollback::common::config::{BranchId, UndoConfig};
use at_rollback::execution::connection::BranchConnection;
use at_rollback::recovery::undo_log::{BranchUndoLog, UndoLogEntry};
use at_rollback::types_db::value::Value;

use crate::common::fixtures::{Harness, XID, account, image};
use crate::common::logger::init_test_logger;

const BRANCHES: BranchId = 6;

fn table_of(branch_id: BranchId) -> String {
    format!("t{}", branch_id)
}

/// One table per branch, each holding the branch's after image `{1, "b"}`.
fn harness_with_branch_tables() -> Harness {
    let harness = Harness::new(UndoConfig::default());
    for branch_id in 0..BRANCHES {
        let table = table_of(branch_id);
        harness.db.create_table(&table, &["id", "name"], &["id"]);
        assert_ok!(
            harness
                .db
                .insert_row(&table, &[("id", Value::new(1)), ("name", Value::new("b"))])
        );
        let entry = UndoLogEntry::update(
            branch_id,
            XID,
            image(&table, vec![account(1, "a")]),
            image(&table, vec![account(1, "b")]),
        );
        assert_ok!(
            harness
                .store
                .insert(&BranchUndoLog::with_entries(XID, branch_id, vec![entry]))
        );
    }
    harness
}

fn name_in(harness: &Harness, table: &str) -> Option<String> {
    harness
        .db
        .rows(table)
        .first()
        .and_then(|row| row.get_value("name"))
        .map(|v| v.to_string())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn branches_roll_back_concurrently() {
    init_test_logger();
    let harness = Arc::new(harness_with_branch_tables());

    let mut handles = Vec::new();
    for branch_id in 0..BRANCHES {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            (branch_id, harness.rollback(branch_id).await)
        }));
    }

    for handle in handles {
        let (branch_id, outcome) = assert_ok!(handle.await);
        let summary = assert_outcome!(outcome, Applied);
        assert_eq!(summary.entries_applied, 1, "branch {}", branch_id);
    }

    for branch_id in 0..BRANCHES {
        assert_eq!(
            name_in(&harness, &table_of(branch_id)).as_deref(),
            Some("a"),
            "branch {}",
            branch_id
        );
    }
    assert!(harness.store.is_empty());
    assert_eq!(harness.db.commit_count(), BRANCHES as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_conflicting_branch_does_not_affect_the_others() {
    init_test_logger();
    let harness = harness_with_branch_tables();
    // Another transaction overwrote branch 2's row after the branch wrote it.
    let dirty = table_of(2);
    let mut conn = harness.db.connect();
    assert_ok!(conn.begin().await);
    assert_ok!(
        conn.execute(
            &format!("UPDATE {} SET name = ? WHERE id = ?", dirty),
            &[Value::new("z"), Value::new(1)]
        )
        .await
    );
    assert_ok!(conn.commit().await);
    let harness = Arc::new(harness);

    let mut handles = Vec::new();
    for branch_id in 0..BRANCHES {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            (branch_id, harness.rollback(branch_id).await)
        }));
    }

    for handle in handles {
        let (branch_id, outcome) = assert_ok!(handle.await);
        if branch_id == 2 {
            let err = assert_outcome!(outcome, Conflict);
            assert!(err.is_conflict());
        } else {
            assert_outcome!(outcome, Applied);
        }
    }

    assert_eq!(name_in(&harness, &dirty).as_deref(), Some("z"));
    assert_eq!(name_in(&harness, &table_of(3)).as_deref(), Some("a"));
    assert!(harness.store.contains(XID, 2));
    assert_eq!(harness.store.len(), 1);
}
