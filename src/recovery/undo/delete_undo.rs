use crate::catalog::table_meta::TableMeta;
use crate::common::exception::UndoError;
use crate::recovery::undo::undo_executor::{
    UndoStatement, required_image, resolve_primary_keys, values_of,
};
use crate::recovery::undo_log::{SqlType, UndoLogEntry};
use crate::sql::sql_builder::SqlBuilder;

/// Re-inserts the deleted rows: `INSERT INTO t (<all cols>) VALUES (?, ...)`.
///
/// Columns are those of the first before-image row, in captured order.
pub(crate) fn build(
    entry: &UndoLogEntry,
    builder: &SqlBuilder<'_>,
    table_meta: Option<&TableMeta>,
) -> Result<UndoStatement, UndoError> {
    let table = entry.get_table_name();
    let before = required_image(entry, entry.get_before_image(), "before")?;
    let pk_names = resolve_primary_keys(table, before, table_meta)?;

    let columns: Vec<String> = before
        .first_row()
        .map(|row| {
            row.get_fields()
                .iter()
                .map(|f| f.get_name().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut parameter_rows = Vec::with_capacity(before.len());
    let mut row_keys = Vec::with_capacity(before.len());
    for row in before.get_rows() {
        parameter_rows.push(values_of(table, row, &columns)?);
        row_keys.push(values_of(table, row, &pk_names)?);
    }

    Ok(UndoStatement::new(
        SqlType::Delete,
        table,
        builder.insert(table, &columns),
        pk_names,
        parameter_rows,
        row_keys,
    ))
}
