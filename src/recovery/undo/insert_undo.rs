use crate::catalog::table_meta::TableMeta;
use crate::common::exception::UndoError;
use crate::recovery::undo::undo_executor::{
    UndoStatement, required_image, resolve_primary_keys, values_of,
};
use crate::recovery::undo_log::{SqlType, UndoLogEntry};
use crate::sql::sql_builder::SqlBuilder;

/// Removes the inserted rows: `DELETE FROM t WHERE <pk> = ?`, one execution
/// per after-image row.
pub(crate) fn build(
    entry: &UndoLogEntry,
    builder: &SqlBuilder<'_>,
    table_meta: Option<&TableMeta>,
) -> Result<UndoStatement, UndoError> {
    let table = entry.get_table_name();
    let after = required_image(entry, entry.get_after_image(), "after")?;
    let pk_names = resolve_primary_keys(table, after, table_meta)?;

    let row_keys = after
        .get_rows()
        .iter()
        .map(|row| values_of(table, row, &pk_names))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UndoStatement::new(
        SqlType::Insert,
        table,
        builder.delete(table, &pk_names),
        pk_names,
        row_keys.clone(),
        row_keys,
    ))
}
