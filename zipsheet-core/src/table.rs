//! Column writes and stale-row pruning on a [`Sheet`].

use chrono::NaiveDateTime;

use crate::{
    error::SheetError,
    layout::FIRST_DATA_ROW,
    sheet::{CellValue, Sheet},
};

/// Write `values` down `column`, starting at the first data row.
///
/// Rows below the written values are left as they were, so a series that
/// shrinks between refreshes leaves its old tail behind.
pub fn write_column<S>(sheet: &mut S, column: usize, values: Vec<CellValue>)
where
    S: Sheet + ?Sized,
{
    if values.is_empty() {
        return;
    }

    tracing::debug!(sheet = sheet.name(), column, rows = values.len(), "writing column");
    let rows = values.into_iter().map(|v| vec![v]).collect();
    sheet.set_values(FIRST_DATA_ROW, column, rows);
}

/// Delete every row whose first cell is a date-time strictly before `now`.
///
/// Cells that are not date-times (headers, blanks, text) are never removed.
/// Returns the number of rows deleted.
pub fn prune_stale_rows<S>(sheet: &mut S, now: NaiveDateTime) -> Result<usize, SheetError>
where
    S: Sheet + ?Sized,
{
    let stale: Vec<usize> = sheet
        .data_range()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.first().and_then(CellValue::as_datetime).is_some_and(|t| t < now)
        })
        .map(|(i, _)| i + 1)
        .collect();

    // Highest row first: deleting a row shifts every row below it.
    for &row in stale.iter().rev() {
        sheet.delete_row(row)?;
    }

    if !stale.is_empty() {
        tracing::debug!(sheet = sheet.name(), removed = stale.len(), "pruned past rows");
    }

    Ok(stale.len())
}
