//! Change notifications for the book table.
//!
//! Every store mutation the editor performs goes through [`ObservedStore`],
//! which tags it with an [`Origin`] and reports it to registered listeners
//! so a presentation layer can refresh. The origin is what separates
//! user-originated edits (which may create undo commands) from history
//! replay and clipboard writes (which never do).

use crate::error::TableError;
use crate::table::{Row, TableStore};

/// Where a mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A user intent: cell commit, add row, delete rows.
    User,
    /// Undo or redo replaying a recorded command.
    History,
    /// Cut or paste writing cells directly (outside the undo history).
    Clipboard,
    /// Whole-document replacement: load, new, clear.
    Document,
}

/// What changed in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableChange {
    CellChanged { row: usize, col: usize },
    RowInserted { row: usize },
    RowRemoved { row: usize },
    /// Contents replaced wholesale; listeners should re-read everything.
    Reset { rows: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEvent {
    pub origin: Origin,
    pub change: TableChange,
}

/// Callback type for receiving table events.
pub type EventCallback = Box<dyn FnMut(&TableEvent)>;

/// Deliver one event to every listener, in registration order.
pub(crate) fn notify(listeners: &mut [EventCallback], origin: Origin, change: TableChange) {
    let event = TableEvent { origin, change };
    for listener in listeners.iter_mut() {
        listener(&event);
    }
}

/// A [`TableStore`] wrapper that reports successful mutations.
///
/// Writing a value identical to the current one is not reported.
pub struct ObservedStore<'a, S: TableStore + ?Sized> {
    inner: &'a mut S,
    listeners: &'a mut [EventCallback],
    origin: Origin,
}

impl<'a, S: TableStore + ?Sized> ObservedStore<'a, S> {
    pub fn new(inner: &'a mut S, listeners: &'a mut [EventCallback], origin: Origin) -> Self {
        Self { inner, listeners, origin }
    }
}

impl<S: TableStore + ?Sized> TableStore for ObservedStore<'_, S> {
    fn row_count(&self) -> usize {
        self.inner.row_count()
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn get(&self, row: usize, col: usize) -> Result<&str, TableError> {
        self.inner.get(row, col)
    }

    fn set(&mut self, row: usize, col: usize, text: &str) -> Result<(), TableError> {
        if self.inner.get(row, col)? == text {
            return Ok(());
        }
        self.inner.set(row, col, text)?;
        notify(self.listeners, self.origin, TableChange::CellChanged { row, col });
        Ok(())
    }

    fn insert_row(&mut self, at: usize, content: Option<Row>) -> Result<(), TableError> {
        self.inner.insert_row(at, content)?;
        notify(self.listeners, self.origin, TableChange::RowInserted { row: at });
        Ok(())
    }

    fn remove_row(&mut self, at: usize) -> Result<Row, TableError> {
        let removed = self.inner.remove_row(at)?;
        notify(self.listeners, self.origin, TableChange::RowRemoved { row: at });
        Ok(removed)
    }

    fn row(&self, at: usize) -> Result<Row, TableError> {
        self.inner.row(at)
    }
}

/// Simple event collector for testing and for headless front ends.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<TableEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: TableEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events with the given origin.
    pub fn from_origin(&self, origin: Origin) -> Vec<&TableEvent> {
        self.events.iter().filter(|e| e.origin == origin).collect()
    }
}
