use crate::{Result, error::XlsxError};

/// One accepted worksheet row. `cells[i]` is column `i`; `None` is a cell
/// the sheet does not fill (as opposed to an empty string).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Option<String>>,
}

impl Row {
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Comma-joined values; absent cells become empty fields. Values are
    /// written as resolved, quote-wrapping included.
    pub fn to_csv_line(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Vec<Option<String>>> for Row {
    fn from(cells: Vec<Option<String>>) -> Self {
        Row { cells }
    }
}

/// Collects the cells of the row being read into a fixed-width record and
/// keeps the rows worth keeping.
#[derive(Debug)]
pub(crate) struct RowAssembler {
    record: Vec<Option<String>>,
    last_column: Option<usize>,
    rows: Vec<Row>,
}

impl RowAssembler {
    pub(crate) fn new(width: usize) -> Self {
        RowAssembler {
            record: vec![None; width],
            last_column: None,
            rows: Vec::new(),
        }
    }

    /// Column a cell without a reference lands in.
    pub(crate) fn next_column(&self) -> usize {
        self.last_column.map_or(0, |c| c + 1)
    }

    pub(crate) fn store(&mut self, reference: &str, column: usize, value: Option<String>) -> Result<()> {
        let width = self.record.len();
        if width == 0 {
            return Ok(());
        }
        let slot = self
            .record
            .get_mut(column)
            .ok_or_else(|| XlsxError::ColumnOutOfRange {
                reference: reference.to_owned(),
                column,
                width,
            })?;
        *slot = value;
        self.note_column(column);
        Ok(())
    }

    pub(crate) fn note_column(&mut self, column: usize) {
        self.last_column = Some(self.last_column.map_or(column, |c| c.max(column)));
    }

    /// Closes the current row: keeps it when column 0 or 1 holds a value,
    /// then resets the record for the next row.
    pub(crate) fn finish_row(&mut self) {
        let keep = self.record.first().is_some_and(Option::is_some)
            || self.record.get(1).is_some_and(Option::is_some);
        if keep {
            self.rows.push(Row::from(self.record.clone()));
        }
        self.record.fill(None);
        self.last_column = None;
    }

    pub(crate) fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn value(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    #[test]
    fn blank_rows_are_dropped() {
        let mut rows = RowAssembler::new(3);
        rows.store("C1", 2, value("only c")).unwrap();
        rows.finish_row();
        rows.finish_row();
        assert!(rows.into_rows().is_empty());
    }

    #[test]
    fn first_or_second_column_keeps_the_row() {
        let mut rows = RowAssembler::new(3);
        rows.store("A1", 0, value("a")).unwrap();
        rows.finish_row();
        rows.store("B2", 1, value("b")).unwrap();
        rows.store("C2", 2, value("c")).unwrap();
        rows.finish_row();
        assert_eq!(
            rows.into_rows(),
            vec![
                Row::from(vec![value("a"), None, None]),
                Row::from(vec![None, value("b"), value("c")]),
            ]
        );
    }

    #[test]
    fn rejected_row_does_not_leak() {
        let mut rows = RowAssembler::new(3);
        rows.store("C1", 2, value("stale")).unwrap();
        rows.finish_row();
        rows.store("A2", 0, value("fresh")).unwrap();
        rows.finish_row();
        assert_eq!(rows.into_rows(), vec![Row::from(vec![value("fresh"), None, None])]);
    }

    #[test]
    fn unresolved_cell_stays_absent() {
        let mut rows = RowAssembler::new(2);
        rows.store("A1", 0, None).unwrap();
        rows.store("B1", 1, value("x")).unwrap();
        rows.finish_row();
        assert_eq!(rows.into_rows(), vec![Row::from(vec![None, value("x")])]);
    }

    #[test]
    fn column_past_width() {
        let mut rows = RowAssembler::new(2);
        let err = rows.store("C1", 2, value("x")).unwrap_err();
        assert!(matches!(
            err,
            XlsxError::ColumnOutOfRange { ref reference, column: 2, width: 2 } if reference == "C1"
        ));
    }

    #[test]
    fn zero_width_keeps_nothing() {
        let mut rows = RowAssembler::new(0);
        rows.store("A1", 0, value("x")).unwrap();
        rows.finish_row();
        assert!(rows.into_rows().is_empty());
    }

    #[test]
    fn next_column_follows_highest_seen() {
        let mut rows = RowAssembler::new(5);
        assert_eq!(rows.next_column(), 0);
        rows.store("C1", 2, value("x")).unwrap();
        rows.store("A1", 0, value("y")).unwrap();
        assert_eq!(rows.next_column(), 3);
        rows.finish_row();
        assert_eq!(rows.next_column(), 0);
    }

    #[test]
    fn csv_line() {
        let row = Row::from(vec![value("\"name\""), None, value("3")]);
        assert_eq!(row.to_csv_line(), "\"name\",,3");
        assert_eq!(row.get(0), Some("\"name\""));
        assert_eq!(row.get(1), None);
        assert_eq!(row.len(), 3);
    }
}
