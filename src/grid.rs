use crate::cell::CellValue;
use serde::{Deserialize, Serialize};

static EMPTY: CellValue = CellValue::Empty;

/// Live, editable cells of the active sheet.
///
/// Rows are stored as they came out of the container: the outer vector and
/// each row may have any length, and nothing is padded until a write needs
/// a cell that does not exist yet. Row 0 is the header row only as far as
/// the display is concerned; here it is an ordinary row.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Grid { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    /// Typed value at (row, col); out-of-bounds reads are `Empty`.
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Text of the cell at (row, col), or an empty string outside the grid.
    pub fn read_cell(&self, row: usize, col: usize) -> String {
        self.value(row, col).to_text()
    }

    /// Stores what the user typed at (row, col), growing the grid as needed.
    pub fn write_cell(&mut self, row: usize, col: usize, input: &str) {
        self.write_value(row, col, CellValue::from_input(input));
    }

    /// Stores a typed value at (row, col).
    ///
    /// Afterwards rows `0..=row` exist and row `row` has at least `col + 1`
    /// cells; every cell created on the way is `Empty`.
    ///
    /// Growth allocates every row up to `row`, so callers taking indices from
    /// users must check them against `MAX_ROWS`/`MAX_COLS` first, as
    /// `ReviewSession::write_cell` does.
    ///
    /// # Panics
    /// If `row` or `col` is `usize::MAX`.
    pub fn write_value(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
