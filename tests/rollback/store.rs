use at_rollback::common::config::{LogSerialization, UndoConfig};
use at_rollback::common::exception::UndoError;
use at_rollback::recovery::undo_log::BranchUndoLog;
use at_rollback::recovery::undo_log_codec::UndoLogCodec;
use at_rollback::recovery::undo_log_store::UndoLogStore;

use crate::common::fixtures::{
    Harness, XID, account, accounts_of, delete_entry, insert_entry, update_entry,
};
use crate::common::logger::init_test_logger;

fn bincode_config() -> UndoConfig {
    UndoConfig {
        log_serialization: LogSerialization::Bincode,
        ..UndoConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bincode_logs_roll_back_like_json_logs() {
    init_test_logger();
    let harness = Harness::with_accounts(bincode_config(), &[(1, "b"), (3, "new")]);
    harness.store_log(
        7,
        vec![
            update_entry(7, vec![account(1, "a")], vec![account(1, "b")]),
            delete_entry(7, vec![account(2, "gone")]),
            insert_entry(7, vec![account(3, "new")]),
        ],
    );

    let summary = assert_outcome!(harness.rollback(7).await, Applied);
    assert_eq!(summary.entries_applied, 3);
    assert_eq!(
        harness.accounts(),
        accounts_of(&[(1, "a"), (2, "gone")])
    );
    assert!(!harness.store.contains(XID, 7));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn json_log_is_readable_by_a_bincode_store() {
    init_test_logger();
    let harness = Harness::with_accounts(bincode_config(), &[(1, "b")]);
    let log = BranchUndoLog::with_entries(
        XID,
        8,
        vec![update_entry(8, vec![account(1, "a")], vec![account(1, "b")])],
    );
    let bytes = assert_ok!(UndoLogCodec::new(LogSerialization::Json).encode(&log));
    harness.store.insert_raw(XID, 8, bytes);

    assert_outcome!(harness.rollback(8).await, Applied);
    assert_eq!(harness.accounts(), accounts_of(&[(1, "a")]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn corrupt_log_is_fatal_and_kept() {
    init_test_logger();
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "b")]);
    harness.store.insert_raw(XID, 9, b"J{\"xid\":".to_vec());

    let err = assert_outcome!(harness.rollback(9).await, Fatal);
    assert!(matches!(err, UndoError::Codec(_)), "{:?}", err);
    assert!(harness.store.contains(XID, 9));
    assert_eq!(harness.db.commit_count(), 0);
    assert!(harness.db.executed_statements().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logs_are_keyed_by_xid_and_branch() {
    init_test_logger();
    let harness = Harness::with_accounts(UndoConfig::default(), &[(1, "b")]);
    harness.store_log(
        1,
        vec![update_entry(1, vec![account(1, "a")], vec![account(1, "b")])],
    );
    let other = BranchUndoLog::with_entries("other-xid", 1, Vec::new());
    assert_ok!(harness.store.insert(&other));

    assert_outcome!(harness.rollback(1).await, Applied);
    assert!(!harness.store.contains(XID, 1));
    assert!(harness.store.contains("other-xid", 1));

    let found = assert_ok!(harness.store.find_branch_log("other-xid", 1).await);
    assert_eq!(found.map(|log| log.get_xid().to_string()).as_deref(), Some("other-xid"));
}
