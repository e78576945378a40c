use at_rollback::common::config::UndoConfig;
use at_rollback::common::exception::{DbError, UndoError};
use at_rollback::recovery::undo_log::{SqlType, UndoLogEntry};

use crate::common::fixtures::{
    Harness, XID, account, accounts_of, insert_entry, update_entry,
};
use crate::common::logger::init_test_logger;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fatal_entry_discards_all_compensation() {
    init_test_logger();
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "b"), (2, "new")]);
    harness.store_log(
        1,
        vec![
            update_entry(1, vec![account(1, "a")], vec![account(1, "b")]),
            UndoLogEntry::new(1, XID, "t", SqlType::Delete, None, None),
            insert_entry(1, vec![account(2, "new")]),
        ],
    );

    let err = assert_outcome!(harness.rollback(1).await, Fatal);
    assert!(matches!(err, UndoError::InvalidUndoLog(_)));

    // The newest entry was compensated inside the transaction, then discarded.
    assert_eq!(harness.writes(), vec!["DELETE FROM t WHERE id = ?".to_string()]);
    assert_eq!(harness.accounts(), accounts_of(&[(1, "b"), (2, "new")]));
    assert_eq!(harness.db.commit_count(), 0);
    assert_eq!(harness.db.rollback_count(), 1);
    assert!(harness.store.contains(XID, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn database_failure_is_retryable_and_leaves_no_trace() {
    init_test_logger();
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "b"), (2, "new")]);
    harness.store_log(
        1,
        vec![
            update_entry(1, vec![account(1, "a")], vec![account(1, "b")]),
            insert_entry(1, vec![account(2, "new")]),
        ],
    );
    harness.db.fail_statements_matching("UPDATE t");

    let err = assert_outcome!(harness.rollback(1).await, Retryable);
    assert!(matches!(err, UndoError::Database(DbError::Statement(_))));
    assert_eq!(harness.accounts(), accounts_of(&[(1, "b"), (2, "new")]));
    assert!(harness.store.contains(XID, 1));

    // The failure was transient: a retry compensates everything.
    let summary = assert_outcome!(harness.rollback(1).await, Applied);
    assert_eq!(summary.entries_applied, 2);
    assert_eq!(harness.accounts(), accounts_of(&[(1, "a")]));
    assert!(!harness.store.contains(XID, 1));
}
