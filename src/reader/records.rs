//! Header-keyed views over decoded rows.

use std::collections::HashMap;

use crate::sheet::row::Row;

/// Column titles from a header row, one per column, with the quotes that
/// mark text values removed. Absent cells stay `None`.
pub fn header_columns(row: &Row) -> Vec<Option<String>> {
    row.cells
        .iter()
        .map(|title| title.as_ref().map(|t| t.replace('"', "")))
        .collect()
}

/// The titles of [`header_columns`] without the gaps.
pub fn header_from_row(row: &Row) -> Vec<String> {
    header_columns(row).into_iter().flatten().collect()
}

/// One map per row, title → cell. Columns pair up by position until either
/// the header or the row runs out; columns without a title are left out.
pub fn rows_to_maps(header: &[Option<String>], rows: &[Row]) -> Vec<HashMap<String, Option<String>>> {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .zip(&row.cells)
                .filter_map(|(title, cell)| Some((title.clone()?, cell.clone())))
                .collect()
        })
        .collect()
}
