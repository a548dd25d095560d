//! Tabular data store for the book list.
//!
//! The store is an ordered list of fixed-width rows. Row order is display
//! order; a row has no identity beyond its index, so inserting or removing a
//! row shifts every row after it.
//!
//! [`TableStore`] is the capability set commands are written against. Any
//! backing that can honor it (a plain vector, a UI model adapter, the
//! notification wrapper in [`crate::events`]) works with the undo machinery.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Every row has exactly this many fields: name, author, pages.
pub const COLUMN_COUNT: usize = 3;

pub const NAME_COLUMN: usize = 0;
pub const AUTHOR_COLUMN: usize = 1;
pub const PAGES_COLUMN: usize = 2;

/// Column titles, in column order.
pub const COLUMN_TITLES: [&str; COLUMN_COUNT] = ["Name", "Author", "Pages"];

/// One book: name, author, page count (kept as text).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row([String; COLUMN_COUNT]);

impl Row {
    pub fn new(name: impl Into<String>, author: impl Into<String>, pages: impl Into<String>) -> Self {
        Self([name.into(), author.into(), pages.into()])
    }

    /// A row of empty fields.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.0[NAME_COLUMN]
    }

    pub fn author(&self) -> &str {
        &self.0[AUTHOR_COLUMN]
    }

    pub fn pages(&self) -> &str {
        &self.0[PAGES_COLUMN]
    }

    pub fn field(&self, col: usize) -> Option<&str> {
        self.0.get(col).map(String::as_str)
    }

    pub fn set_field(&mut self, col: usize, text: impl Into<String>) -> Result<(), TableError> {
        match self.0.get_mut(col) {
            Some(slot) => {
                *slot = text.into();
                Ok(())
            }
            None => Err(TableError::ColumnOutOfRange { col, cols: COLUMN_COUNT }),
        }
    }

    pub fn fields(&self) -> &[String; COLUMN_COUNT] {
        &self.0
    }

    pub fn into_fields(self) -> [String; COLUMN_COUNT] {
        self.0
    }
}

impl From<[String; COLUMN_COUNT]> for Row {
    fn from(fields: [String; COLUMN_COUNT]) -> Self {
        Self(fields)
    }
}

impl From<[&str; COLUMN_COUNT]> for Row {
    fn from([name, author, pages]: [&str; COLUMN_COUNT]) -> Self {
        Self::new(name, author, pages)
    }
}

/// Mutable, index-addressed table of [`Row`]s.
///
/// Every operation validates its indices and fails with an out-of-range
/// error instead of clamping. A failed call leaves the store unchanged.
pub trait TableStore {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    fn get(&self, row: usize, col: usize) -> Result<&str, TableError>;

    fn set(&mut self, row: usize, col: usize, text: &str) -> Result<(), TableError>;

    /// Insert at `at` (`0..=row_count`). `None` inserts a row of empty fields.
    fn insert_row(&mut self, at: usize, content: Option<Row>) -> Result<(), TableError>;

    /// Remove the row at `at` and hand back its content.
    fn remove_row(&mut self, at: usize) -> Result<Row, TableError>;

    /// Full copy of one row.
    fn row(&self, at: usize) -> Result<Row, TableError> {
        let mut row = Row::empty();
        for col in 0..self.column_count() {
            row.set_field(col, self.get(at, col)?)?;
        }
        Ok(row)
    }
}

/// Vector-backed [`TableStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTable {
    rows: Vec<Row>,
}

impl BookTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), TableError> {
        if row >= self.rows.len() {
            return Err(TableError::RowOutOfRange { row, rows: self.rows.len() });
        }
        if col >= COLUMN_COUNT {
            return Err(TableError::ColumnOutOfRange { col, cols: COLUMN_COUNT });
        }
        Ok(())
    }
}

impl TableStore for BookTable {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, row: usize, col: usize) -> Result<&str, TableError> {
        self.check_cell(row, col)?;
        Ok(&self.rows[row].0[col])
    }

    fn set(&mut self, row: usize, col: usize, text: &str) -> Result<(), TableError> {
        self.check_cell(row, col)?;
        self.rows[row].0[col] = text.to_string();
        Ok(())
    }

    fn insert_row(&mut self, at: usize, content: Option<Row>) -> Result<(), TableError> {
        if at > self.rows.len() {
            return Err(TableError::RowOutOfRange { row: at, rows: self.rows.len() });
        }
        self.rows.insert(at, content.unwrap_or_default());
        Ok(())
    }

    fn remove_row(&mut self, at: usize) -> Result<Row, TableError> {
        if at >= self.rows.len() {
            return Err(TableError::RowOutOfRange { row: at, rows: self.rows.len() });
        }
        Ok(self.rows.remove(at))
    }

    fn row(&self, at: usize) -> Result<Row, TableError> {
        self.rows
            .get(at)
            .cloned()
            .ok_or(TableError::RowOutOfRange { row: at, rows: self.rows.len() })
    }
}
