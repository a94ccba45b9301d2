//! Per-sheet position tracker for stacked table layout.

use crate::conf::N_NROWS_TABLE_GAP;
use crate::util::derive_column_letters;

/// Mutable 2-D position tracker for one sheet.
///
/// Coordinates are 1-indexed (row, column); conversion to the codec's
/// 0-based indices happens at the write boundary only. Pure bookkeeping,
/// no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCursor {
    row: usize,
    col: usize,
}

impl SheetCursor {
    /// Create a cursor at the given 1-indexed position.
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row >= 1 && col >= 1, "cursor coordinates are 1-indexed");
        Self { row, col }
    }

    /// Current row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Current column.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Current `(row, column)` pair.
    pub fn coordinates(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Spreadsheet-style address of the current position (`"B6"`).
    pub fn address(&self) -> String {
        format!("{}{}", derive_column_letters(self.col), self.row)
    }

    /// Move to the next record within the same table.
    pub fn advance_row(&mut self) {
        self.row += 1;
    }

    /// Move to the next field within the same record.
    pub fn advance_column(&mut self) {
        self.col += 1;
    }

    /// Jump back to a fixed column at the start of a new record.
    pub fn set_column(&mut self, col: usize) {
        debug_assert!(col >= 1, "cursor coordinates are 1-indexed");
        self.col = col;
    }

    /// Skip the fixed blank-row gap before the next stacked table.
    pub fn next_table(&mut self) {
        self.row += N_NROWS_TABLE_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_renders_letters_and_row() {
        assert_eq!(SheetCursor::new(1, 50).address(), "AX1");
        assert_eq!(SheetCursor::new(50, 1).address(), "A50");
        assert_eq!(SheetCursor::new(25, 25).address(), "Y25");
        assert_eq!(SheetCursor::new(6, 2).address(), "B6");
        assert_eq!(SheetCursor::new(3, 703).address(), "AAA3");
    }

    #[test]
    fn test_next_table_adds_fixed_gap_per_call() {
        let mut cursor = SheetCursor::new(6, 2);
        for _ in 0..4 {
            cursor.next_table();
        }
        assert_eq!(cursor.coordinates(), (6 + 4 * N_NROWS_TABLE_GAP, 2));
    }

    #[test]
    fn test_row_column_advancement() {
        let mut cursor = SheetCursor::new(6, 2);
        cursor.advance_column();
        cursor.advance_column();
        cursor.advance_row();
        assert_eq!(cursor.coordinates(), (7, 4));

        cursor.set_column(2);
        assert_eq!(cursor.coordinates(), (7, 2));
    }
}
