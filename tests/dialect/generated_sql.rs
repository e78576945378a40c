use at_rollback::common::config::UndoConfig;
use at_rollback::recovery::undo_log::UndoLogEntry;
use at_rollback::sql::handler::registry::DialectRegistry;
use at_rollback::storage::table::row::Row;
use at_rollback::types_db::value::Value;

use crate::common::fixtures::{Harness, XID, col, image, pk};
use crate::common::logger::init_test_logger;

fn order_row(value: &str) -> Row {
    Row::new(vec![pk("id", 1), col("user", "u"), col("value", value)])
}

/// Every dialect's quoting must survive a round trip through its tokenizer.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn undo_sql_is_well_formed_for_every_dialect() {
    init_test_logger();
    let registry = DialectRegistry::with_builtin_dialects();

    for dialect in registry.dialects() {
        let config = UndoConfig {
            dialect: dialect.to_string(),
            ..UndoConfig::default()
        };
        let harness = Harness::new(config);
        harness
            .db
            .create_table("orders", &["id", "user", "value"], &["id"]);

        // UPDATE value v -> w, then DELETE of the row.
        harness.store_log(
            1,
            vec![
                UndoLogEntry::update(
                    1,
                    XID,
                    image("orders", vec![order_row("v")]),
                    image("orders", vec![order_row("w")]),
                ),
                UndoLogEntry::delete(1, XID, image("orders", vec![order_row("w")])),
            ],
        );

        let summary = assert_outcome!(harness.rollback(1).await, Applied);
        assert_eq!(summary.entries_applied, 2, "{}", dialect);
        assert_eq!(summary.statements_executed, 2, "{}", dialect);

        let rows = harness.db.rows("orders");
        assert_eq!(rows.len(), 1, "{}", dialect);
        assert_eq!(rows[0].get_value("value"), Some(&Value::new("v")), "{}", dialect);
        assert_eq!(rows[0].get_value("user"), Some(&Value::new("u")), "{}", dialect);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quoting_follows_the_dialect() {
    init_test_logger();
    let cases = [
        ("oscar", "INSERT INTO \"orders\" (\"id\", \"user\", \"value\") VALUES (?, ?, ?)"),
        ("sqlserver", "INSERT INTO orders (id, [user], value) VALUES (?, ?, ?)"),
        ("postgresql", "INSERT INTO orders (id, \"user\", value) VALUES (?, ?, ?)"),
    ];
    for (dialect, expected) in cases {
        let harness = Harness::new(UndoConfig {
            dialect: dialect.to_string(),
            ..UndoConfig::default()
        });
        harness
            .db
            .create_table("orders", &["id", "user", "value"], &["id"]);
        harness.store_log(
            1,
            vec![UndoLogEntry::delete(1, XID, image("orders", vec![order_row("v")]))],
        );

        assert_outcome!(harness.rollback(1).await, Applied);
        assert_eq!(harness.writes(), vec![expected.to_string()], "{}", dialect);
    }
}
