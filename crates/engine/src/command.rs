//! Reversible table mutations.
//!
//! A [`Command`] captures everything needed to apply a change and to take it
//! back. Commands are built when the user's intent is recognized, but they
//! never mutate anything on construction: the first forward application is
//! done by [`crate::history::UndoStack::push`].
//!
//! Both directions validate every index before touching the store, so a
//! failing `apply`/`revert` leaves the store exactly as it was.

use std::collections::BTreeSet;

use crate::error::TableError;
use crate::table::{Row, TableStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// One field changed from `before` to `after`.
    CellEdit {
        row: usize,
        col: usize,
        before: String,
        after: String,
    },
    /// A row inserted at a remembered index. `None` content means empty fields.
    AddRow { row: usize, content: Option<Row> },
    /// A batch of rows removed in one step.
    ///
    /// `rows` is ascending and unique; `backup[i]` is the content of `rows[i]`
    /// at construction time.
    RemoveRows { rows: Vec<usize>, backup: Vec<Row> },
}

impl Command {
    /// Edit of one cell. `before` must be the value prior to the visible change.
    pub fn cell_edit(row: usize, col: usize, before: impl Into<String>, after: impl Into<String>) -> Self {
        Command::CellEdit {
            row,
            col,
            before: before.into(),
            after: after.into(),
        }
    }

    /// Append a row: the target index is the row count right now and stays
    /// fixed, even if other rows come and go before a redo.
    pub fn add_row<S: TableStore + ?Sized>(store: &S, content: Option<Row>) -> Self {
        Command::AddRow {
            row: store.row_count(),
            content,
        }
    }

    /// Remove the given rows, snapshotting their content now.
    ///
    /// Indices refer to the table before any removal. Duplicates are dropped
    /// and order does not matter.
    pub fn remove_rows<S, I>(store: &S, rows: I) -> Result<Self, TableError>
    where
        S: TableStore + ?Sized,
        I: IntoIterator<Item = usize>,
    {
        let rows: Vec<usize> = rows.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let backup = rows
            .iter()
            .map(|&r| store.row(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Command::RemoveRows { rows, backup })
    }

    /// Short description, as shown in an Edit menu.
    pub fn text(&self) -> String {
        match self {
            Command::CellEdit { row, col, .. } => format!("Edit cell ({},{})", row, col),
            Command::AddRow { .. } => "Add Row".to_string(),
            Command::RemoveRows { rows, .. } if rows.len() == 1 => "Remove Row".to_string(),
            Command::RemoveRows { .. } => "Remove Rows".to_string(),
        }
    }

    /// Forward direction (first execution and redo).
    pub fn apply<S: TableStore + ?Sized>(&self, store: &mut S) -> Result<(), TableError> {
        match self {
            Command::CellEdit { row, col, after, .. } => store.set(*row, *col, after),
            Command::AddRow { row, content } => store.insert_row(*row, content.clone()),
            Command::RemoveRows { rows, .. } => {
                let count = store.row_count();
                if let Some(&last) = rows.last() {
                    if last >= count {
                        return Err(TableError::RowOutOfRange { row: last, rows: count });
                    }
                }
                // Highest index first so pending lower indices stay valid.
                for &r in rows.iter().rev() {
                    store.remove_row(r)?;
                }
                Ok(())
            }
        }
    }

    /// Inverse direction (undo).
    pub fn revert<S: TableStore + ?Sized>(&self, store: &mut S) -> Result<(), TableError> {
        match self {
            Command::CellEdit { row, col, before, .. } => store.set(*row, *col, before),
            Command::AddRow { row, .. } => store.remove_row(*row).map(|_| ()),
            Command::RemoveRows { rows, backup } => {
                let count = store.row_count();
                // Reinsertion is ascending, so the i-th row lands in a table
                // that already holds i of the restored rows.
                for (i, &r) in rows.iter().enumerate() {
                    if r > count + i {
                        return Err(TableError::RowOutOfRange { row: r, rows: count + i });
                    }
                }
                for (&r, content) in rows.iter().zip(backup) {
                    store.insert_row(r, Some(content.clone()))?;
                }
                Ok(())
            }
        }
    }
}
