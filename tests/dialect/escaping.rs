use at_rollback::catalog::column::ColumnMeta;
use at_rollback::catalog::table_meta::TableMeta;
use at_rollback::sql::handler::identifier_policy::CaseFolding;
use at_rollback::sql::handler::registry::DialectRegistry;
use at_rollback::types_db::type_id::TypeId;

const SAMPLE_NAMES: &[&str] = &[
    "id", "ID", "Name", "order", "ORDER_ID", "user", "value", "line_no", "a.b", "Key",
];

#[test]
fn keywords_are_detected_in_any_case() {
    let registry = DialectRegistry::with_builtin_dialects();
    for id in registry.dialects() {
        let policy = assert_ok!(registry.get(id));
        assert!(!policy.keywords().is_empty(), "{} has no keywords", id);
        for keyword in policy.keywords().iter() {
            assert!(policy.is_reserved_keyword(keyword), "{}: {}", id, keyword);
            assert!(
                policy.is_reserved_keyword(&keyword.to_lowercase()),
                "{}: {}",
                id,
                keyword.to_lowercase()
            );
            assert!(policy.needs_escape(keyword, None), "{}: {}", id, keyword);
        }
    }
}

#[test]
fn escaping_is_idempotent() {
    let registry = DialectRegistry::with_builtin_dialects();
    for id in registry.dialects() {
        let policy = assert_ok!(registry.get(id));
        for name in SAMPLE_NAMES {
            let escaped = policy.escape(name);
            assert!(!policy.needs_escape(&escaped, None), "{}: {}", id, escaped);

            let once = policy.add_escape(name, None);
            assert_eq!(policy.add_escape(&once, None), once, "{}: {}", id, name);
            assert_eq!(policy.del_escape(&once), *name, "{}: {}", id, name);

            let table = policy.add_table_escape(name, None);
            assert_eq!(policy.add_table_escape(&table, None), table, "{}: {}", id, name);
        }
    }
}

#[test]
fn case_sensitive_metadata_forces_escape() {
    let registry = DialectRegistry::with_builtin_dialects();
    let meta = TableMeta::new(
        "accounts",
        vec![
            ColumnMeta::new_case_sensitive("ID", TypeId::Integer),
            ColumnMeta::new_case_sensitive("balance", TypeId::Decimal),
            ColumnMeta::new("memo_text", TypeId::VarChar),
        ],
    );
    for id in registry.dialects() {
        let policy = assert_ok!(registry.get(id));
        assert!(policy.needs_escape("ID", Some(&meta)), "{}", id);
        assert!(policy.needs_escape("balance", Some(&meta)), "{}", id);
        assert!(!policy.needs_escape("memo_text", Some(&meta)), "{}", id);
    }
}

#[test]
fn folding_fallback_without_metadata() {
    let registry = DialectRegistry::with_builtin_dialects();
    for id in registry.dialects() {
        let policy = assert_ok!(registry.get(id));
        match policy.case_folding() {
            CaseFolding::Upper => {
                assert!(!policy.needs_escape("ORDER_ID", None), "{}", id);
                assert!(policy.needs_escape("Order_id", None), "{}", id);
            }
            CaseFolding::Lower => {
                assert!(!policy.needs_escape("order_id", None), "{}", id);
                assert!(policy.needs_escape("Order_id", None), "{}", id);
            }
            CaseFolding::None => {
                assert!(!policy.needs_escape("ORDER_ID", None), "{}", id);
                assert!(!policy.needs_escape("Order_id", None), "{}", id);
            }
        }
    }
}

#[test]
fn blank_names_never_escape() {
    let registry = DialectRegistry::with_builtin_dialects();
    for id in registry.dialects() {
        let policy = assert_ok!(registry.get(id));
        assert!(!policy.needs_escape("", None));
        assert!(!policy.needs_escape("   ", None));
        assert_eq!(policy.add_escape("", None), "");
    }
}

#[test]
fn folding_is_declared_per_dialect() {
    let registry = DialectRegistry::with_builtin_dialects();
    let folding = |id: &str| assert_ok!(registry.get(id)).case_folding();
    assert_eq!(folding("oscar"), CaseFolding::Upper);
    assert_eq!(folding("oracle"), CaseFolding::Upper);
    assert_eq!(folding("pg"), CaseFolding::Lower);
    assert_eq!(folding("mariadb"), CaseFolding::None);
    assert_eq!(folding("mssql"), CaseFolding::None);
    assert_eq!(folding("ansi"), CaseFolding::None);
}
