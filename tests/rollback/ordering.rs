use at_rollback::common::config::UndoConfig;

use crate::common::fixtures::{Harness, account, accounts_of, insert_entry, update_entry};
use crate::common::logger::init_test_logger;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn later_statements_are_undone_first() {
    init_test_logger();
    // The branch inserted row 1 as "a" and then updated it to "b".
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "b")]);
    harness.store_log(
        1,
        vec![
            insert_entry(1, vec![account(1, "a")]),
            update_entry(1, vec![account(1, "a")], vec![account(1, "b")]),
        ],
    );

    let summary = assert_outcome!(harness.rollback(1).await, Applied);

    assert_eq!(
        harness.writes(),
        vec![
            "UPDATE t SET name = ? WHERE id = ?".to_string(),
            "DELETE FROM t WHERE id = ?".to_string(),
        ]
    );
    assert_eq!(summary.entries_applied, 2);
    assert_eq!(summary.statements_executed, 2);
    assert!(harness.accounts().is_empty());
    assert_eq!(harness.db.commit_count(), 1);
    assert!(harness.store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn chained_updates_restore_the_oldest_value() {
    init_test_logger();
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "v3"), (2, "keep")]);
    harness.store_log(
        1,
        vec![
            update_entry(1, vec![account(1, "v1")], vec![account(1, "v2")]),
            update_entry(1, vec![account(1, "v2")], vec![account(1, "v3")]),
        ],
    );

    assert_outcome!(harness.rollback(1).await, Applied);
    assert_eq!(harness.accounts(), accounts_of(&[(1, "v1"), (2, "keep")]));
}
