use crate::catalog::table_meta::TableMeta;
use crate::common::exception::UndoError;
use crate::recovery::undo::undo_executor::{
    UndoStatement, required_image, resolve_primary_keys, values_of,
};
use crate::recovery::undo_log::{SqlType, UndoLogEntry};
use crate::sql::sql_builder::SqlBuilder;

/// Restores the before image: `UPDATE t SET <non-key cols> = ? WHERE <pk> = ?`.
///
/// The set columns come from the first before-image row; parameters bind the
/// row's non-key values followed by its key values.
pub(crate) fn build(
    entry: &UndoLogEntry,
    builder: &SqlBuilder<'_>,
    table_meta: Option<&TableMeta>,
) -> Result<UndoStatement, UndoError> {
    let table = entry.get_table_name();
    let before = required_image(entry, entry.get_before_image(), "before")?;
    let after = required_image(entry, entry.get_after_image(), "after")?;
    if before.len() != after.len() {
        return Err(UndoError::InvalidUndoLog(format!(
            "UPDATE undo of table {} has {} before rows but {} after rows",
            table,
            before.len(),
            after.len()
        )));
    }

    let pk_names = resolve_primary_keys(table, before, table_meta)?;
    let set_columns: Vec<String> = before
        .get_rows()
        .iter()
        .take(1)
        .flat_map(|row| row.get_fields())
        .filter(|f| !pk_names.iter().any(|pk| pk.eq_ignore_ascii_case(f.get_name())))
        .map(|f| f.get_name().to_string())
        .collect();
    if set_columns.is_empty() {
        return Err(UndoError::InvalidUndoLog(format!(
            "UPDATE undo of table {} has no non-key columns to restore",
            table
        )));
    }

    let mut parameter_rows = Vec::with_capacity(before.len());
    let mut row_keys = Vec::with_capacity(before.len());
    for row in before.get_rows() {
        let key = values_of(table, row, &pk_names)?;
        let mut params = values_of(table, row, &set_columns)?;
        params.extend(key.iter().cloned());
        parameter_rows.push(params);
        row_keys.push(key);
    }

    let sql = builder.update(table, &set_columns, &pk_names);
    Ok(UndoStatement::new(
        SqlType::Update,
        table,
        sql,
        pk_names,
        parameter_rows,
        row_keys,
    ))
}
