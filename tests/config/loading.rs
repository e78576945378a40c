use std::io::Write;
use std::path::Path;
use std::time::Duration;

use at_rollback::common::config::{ConflictPolicy, LogSerialization, UndoConfig};
use at_rollback::common::exception::UndoError;
use tempfile::NamedTempFile;

use crate::common::fixtures::{Harness, account, accounts_of, update_entry};
use crate::common::logger::init_test_logger;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = assert_ok!(NamedTempFile::new());
    assert_ok!(file.write_all(contents.as_bytes()));
    assert_ok!(file.flush());
    file
}

#[test]
fn loads_every_setting_from_file() {
    let file = config_file(
        r#"
        dialect = "postgresql"
        data_validation = false
        conflict_policy = "escalate"
        rollback_timeout_ms = 750
        max_in_size = 64
        log_serialization = "bincode"
        "#,
    );

    let config = assert_ok!(UndoConfig::load(file.path()));
    assert_eq!(config.dialect, "postgresql");
    assert!(!config.data_validation);
    assert_eq!(config.conflict_policy, ConflictPolicy::Escalate);
    assert_eq!(config.rollback_timeout(), Some(Duration::from_millis(750)));
    assert_eq!(config.max_in_size, 64);
    assert_eq!(config.log_serialization, LogSerialization::Bincode);
}

#[test]
fn empty_file_yields_defaults() {
    let file = config_file("");
    assert_eq!(assert_ok!(UndoConfig::load(file.path())), UndoConfig::default());
}

#[test]
fn invalid_files_are_config_errors() {
    let missing = UndoConfig::load(Path::new("/nonexistent/at-rollback/undo.toml"));
    assert!(matches!(assert_err!(missing), UndoError::Config(_)));

    let blank_dialect = config_file("dialect = \"  \"");
    assert!(matches!(
        assert_err!(UndoConfig::load(blank_dialect.path())),
        UndoError::Config(_)
    ));

    let wrong_type = config_file("max_in_size = \"many\"");
    let err = assert_err!(UndoConfig::load(wrong_type.path()));
    assert!(matches!(err, UndoError::Config(_)));
    assert!(!err.is_conflict());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loaded_config_drives_rollback() {
    init_test_logger();
    let file = config_file("data_validation = false\n");
    let config = assert_ok!(UndoConfig::load(file.path()));

    // Without the dirty-write guard the foreign "z" is overwritten.
    let harness = Harness::with_accounts(config, &[(1, "z")]);
    harness.store_log(
        1,
        vec![update_entry(1, vec![account(1, "a")], vec![account(1, "b")])],
    );

    let summary = assert_outcome!(harness.rollback(1).await, Applied);
    assert_eq!(summary.entries_applied, 1);
    assert_eq!(harness.accounts(), accounts_of(&[(1, "a")]));
    assert!(harness.db.executed_statements().iter().all(|sql| !sql.starts_with("SELECT")));
}
