use std::fmt;

/// Index errors raised by the table store and everything layered on it.
///
/// These are contract violations: callers get the error back unchanged and the
/// store is left untouched. Indices are never clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Row index outside `0..rows` (or `0..=rows` for insertion).
    RowOutOfRange { row: usize, rows: usize },
    /// Column index outside `0..cols`.
    ColumnOutOfRange { col: usize, cols: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row, rows } => {
                write!(f, "row {row} out of range (table has {rows} row(s))")
            }
            Self::ColumnOutOfRange { col, cols } => {
                write!(f, "column {col} out of range (table has {cols} column(s))")
            }
        }
    }
}

impl std::error::Error for TableError {}
