//! Editor façade: turns user intents into undoable commands.
//!
//! The editor owns the table, its undo history, the change listeners and the
//! clipboard. Every store mutation goes through an [`ObservedStore`] tagged
//! with its [`Origin`]; only [`Origin::User`] writes build commands, so
//! replaying history or pasting never records new ones.
//!
//! Cut and paste write cells directly and are not undoable.

use std::collections::BTreeSet;

use booklist_core::{CellRef, Selection};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::command::Command;
use crate::error::TableError;
use crate::events::{notify, EventCallback, ObservedStore, Origin, TableChange};
use crate::history::UndoStack;
use crate::table::{BookTable, Row, TableStore};

/// Value a cell held when its editor committed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdit {
    cell: CellRef,
    before: String,
}

pub struct Editor<S: TableStore = BookTable> {
    store: S,
    history: UndoStack,
    listeners: Vec<EventCallback>,
    clipboard: Box<dyn Clipboard>,
    new_row: Option<Row>,
    pending_edit: Option<PendingEdit>,
    /// Changed outside the undo history (cut/paste) since the last save.
    dirty: bool,
}

impl Editor<BookTable> {
    pub fn new() -> Self {
        Self::with_store(BookTable::new())
    }
}

impl Default for Editor<BookTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TableStore> Editor<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            history: UndoStack::new(),
            listeners: Vec::new(),
            clipboard: Box::new(MemoryClipboard::new()),
            new_row: None,
            pending_edit: None,
            dirty: false,
        }
    }

    /// Use `clipboard` instead of the built-in in-memory one.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Content for rows created by [`Editor::add_row`]. Without a template new
    /// rows are empty.
    pub fn with_new_row(mut self, template: Row) -> Self {
        self.new_row = Some(template);
        self
    }

    /// Cap the undo history (0 = unlimited).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = UndoStack::with_limit(limit);
        self
    }

    /// Register a change listener (the view refresh hook).
    pub fn subscribe(&mut self, listener: EventCallback) {
        self.listeners.push(listener);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    pub fn row_count(&self) -> usize {
        self.store.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.store.column_count()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&str, TableError> {
        self.store.get(row, col)
    }

    /// Copy of every row, top to bottom.
    pub fn snapshot(&self) -> Result<Vec<Row>, TableError> {
        (0..self.store.row_count()).map(|r| self.store.row(r)).collect()
    }

    // ------------------------------------------------------------------
    // Cell editing
    // ------------------------------------------------------------------

    /// Record the value of a cell as its editor commits, before the new text
    /// reaches the store.
    pub fn capture_pre_edit(&mut self, row: usize, col: usize) -> Result<(), TableError> {
        let before = self.store.get(row, col)?.to_string();
        self.pending_edit = Some(PendingEdit { cell: CellRef::new(row, col), before });
        Ok(())
    }

    /// Write from the editing widget.
    ///
    /// The text lands in the store, then a `CellEdit` from the captured
    /// pre-edit value to `text` is pushed. Without a matching capture the
    /// value read just before the write is used. Committing the text the
    /// cell already holds records nothing.
    pub fn set_data(&mut self, row: usize, col: usize, text: &str) -> Result<(), TableError> {
        let current = self.store.get(row, col)?.to_string();
        let before = match self.pending_edit.take() {
            Some(pending) if pending.cell == CellRef::new(row, col) => pending.before,
            _ => current.clone(),
        };
        if before == text && current == text {
            return Ok(());
        }

        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::User);
        store.set(row, col, text)?;
        self.history.push(Command::cell_edit(row, col, before, text), &mut store)
    }

    /// Capture and commit in one step.
    pub fn edit_cell(&mut self, row: usize, col: usize, text: &str) -> Result<(), TableError> {
        self.capture_pre_edit(row, col)?;
        self.set_data(row, col, text)
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Append a row (undoable).
    pub fn add_row(&mut self) -> Result<(), TableError> {
        let command = Command::add_row(&self.store, self.new_row.clone());
        self.push(command)
    }

    /// Remove rows (undoable). Indices refer to the current table; duplicates
    /// and order are irrelevant. Returns false when `rows` is empty.
    pub fn delete_rows<I: IntoIterator<Item = usize>>(&mut self, rows: I) -> Result<bool, TableError> {
        let rows: BTreeSet<usize> = rows.into_iter().collect();
        if rows.is_empty() {
            return Ok(false);
        }
        let command = Command::remove_rows(&self.store, rows)?;
        self.push(command)?;
        Ok(true)
    }

    /// Remove every row the selection touches.
    pub fn delete_selected_rows(&mut self, selection: &Selection) -> Result<bool, TableError> {
        self.delete_rows(selection.rows())
    }

    fn push(&mut self, command: Command) -> Result<(), TableError> {
        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::User);
        self.history.push(command, &mut store)
    }

    // ------------------------------------------------------------------
    // Undo / Redo
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> Result<bool, TableError> {
        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::History);
        self.history.undo(&mut store)
    }

    pub fn redo(&mut self) -> Result<bool, TableError> {
        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::History);
        self.history.redo(&mut store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Put the first selected cell's text on the clipboard.
    pub fn copy(&mut self, selection: &Selection) -> Result<bool, TableError> {
        let Some(first) = selection.first_cell() else {
            return Ok(false);
        };
        let text = self.store.get(first.row, first.col)?.to_string();
        self.clipboard.set_text(text);
        Ok(true)
    }

    /// Copy, then blank every selected cell. Not recorded in the history.
    pub fn cut(&mut self, selection: &Selection) -> Result<bool, TableError> {
        if selection.is_empty() {
            return Ok(false);
        }
        for cell in selection.all_cells() {
            self.store.get(cell.row, cell.col)?;
        }
        self.copy(selection)?;

        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::Clipboard);
        for cell in selection.all_cells() {
            store.set(cell.row, cell.col, "")?;
        }
        self.dirty = true;
        Ok(true)
    }

    /// Write the clipboard text into the first target cell. Not recorded in
    /// the history, and not checked by the pages gate.
    pub fn paste(&mut self, target: &Selection) -> Result<bool, TableError> {
        let Some(first) = target.first_cell() else {
            return Ok(false);
        };
        let text = self.clipboard.text();
        let mut store = ObservedStore::new(&mut self.store, &mut self.listeners, Origin::Clipboard);
        store.set(first.row, first.col, &text)?;
        self.dirty = true;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Document state
    // ------------------------------------------------------------------

    /// True if the table differs from what was last loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.dirty || !self.history.is_clean()
    }

    /// The current content has been written out.
    pub fn mark_saved(&mut self) {
        self.history.set_clean();
        self.dirty = false;
    }

    /// Remove every row and forget the history.
    pub fn clear(&mut self) -> Result<(), TableError> {
        while self.store.row_count() > 0 {
            let last = self.store.row_count() - 1;
            self.store.remove_row(last)?;
        }
        self.reset_document();
        Ok(())
    }

    /// Replace the whole table with freshly loaded rows.
    pub fn replace_rows(&mut self, rows: Vec<Row>) -> Result<(), TableError> {
        while self.store.row_count() > 0 {
            let last = self.store.row_count() - 1;
            self.store.remove_row(last)?;
        }
        for (i, row) in rows.into_iter().enumerate() {
            self.store.insert_row(i, Some(row))?;
        }
        self.reset_document();
        Ok(())
    }

    fn reset_document(&mut self) {
        self.history.clear();
        self.pending_edit = None;
        self.dirty = false;
        let rows = self.store.row_count();
        notify(&mut self.listeners, Origin::Document, TableChange::Reset { rows });
    }
}

impl Editor<BookTable> {
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }
}

/// Unique rows of a selection, ascending (what "delete selected rows" acts on).
pub fn selected_rows(selection: &Selection) -> Vec<usize> {
    selection.rows().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::events::{EventCollector, TableEvent};

    fn three_books() -> Editor {
        let mut editor = Editor::new();
        editor
            .replace_rows(vec![
                Row::new("Dune", "Frank Herbert", "412"),
                Row::new("Emma", "Jane Austen", "474"),
                Row::new("Kindred", "Octavia Butler", "264"),
            ])
            .unwrap();
        editor
    }

    fn collect(editor: &mut Editor) -> Rc<RefCell<EventCollector>> {
        let collector = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&collector);
        editor.subscribe(Box::new(move |event: &TableEvent| sink.borrow_mut().push(event.clone())));
        collector
    }

    #[test]
    fn test_add_edit_undo_scenario() {
        let mut editor = Editor::new();
        editor.add_row().unwrap();
        assert_eq!(editor.row_count(), 1);

        editor.edit_cell(0, 0, "Dune").unwrap();
        assert_eq!(editor.get(0, 0).unwrap(), "Dune");

        editor.undo().unwrap();
        assert_eq!(editor.get(0, 0).unwrap(), "");
        editor.undo().unwrap();
        assert_eq!(editor.row_count(), 0);
    }

    #[test]
    fn test_new_row_template() {
        let mut editor = Editor::new().with_new_row(Row::from(["New book", "Author", "1"]));
        editor.add_row().unwrap();
        assert_eq!(editor.rows()[0], Row::from(["New book", "Author", "1"]));

        editor.edit_cell(0, 0, "Dune").unwrap();
        editor.undo().unwrap();
        assert_eq!(editor.get(0, 0).unwrap(), "New book");
    }

    #[test]
    fn test_delete_rows_scenario() {
        let mut editor = three_books();
        let original = editor.rows().to_vec();

        assert!(editor.delete_rows([2, 0]).unwrap());
        assert_eq!(editor.row_count(), 1);
        assert_eq!(editor.rows()[0], original[1]);

        editor.undo().unwrap();
        assert_eq!(editor.rows(), original.as_slice());
    }

    #[test]
    fn test_delete_nothing_is_noop() {
        let mut editor = three_books();
        assert!(!editor.delete_rows(Vec::new()).unwrap());
        assert!(!editor.can_undo());
        assert!(!editor.delete_selected_rows(&Selection::empty()).unwrap());
    }

    #[test]
    fn test_widget_commit_uses_captured_value() {
        let mut editor = three_books();
        editor.capture_pre_edit(1, 0).unwrap();
        editor.set_data(1, 0, "Persuasion").unwrap();

        assert_eq!(editor.history().len(), 1);
        assert_eq!(
            editor.history().commands()[0],
            Command::cell_edit(1, 0, "Emma", "Persuasion")
        );
        editor.undo().unwrap();
        assert_eq!(editor.get(1, 0).unwrap(), "Emma");
        editor.redo().unwrap();
        assert_eq!(editor.get(1, 0).unwrap(), "Persuasion");
    }

    #[test]
    fn test_stale_capture_is_ignored() {
        let mut editor = three_books();
        editor.capture_pre_edit(0, 0).unwrap();
        editor.set_data(2, 1, "O. E. Butler").unwrap();
        assert_eq!(
            editor.history().commands()[0],
            Command::cell_edit(2, 1, "Octavia Butler", "O. E. Butler")
        );
    }

    #[test]
    fn test_unchanged_commit_records_nothing() {
        let mut editor = three_books();
        let events = collect(&mut editor);

        editor.edit_cell(0, 0, "Emma").unwrap();
        editor.undo().unwrap();
        assert!(!editor.is_modified());

        editor.edit_cell(0, 0, "Dune").unwrap();
        editor.capture_pre_edit(1, 2).unwrap();
        editor.set_data(1, 2, "474").unwrap();

        assert!(editor.can_redo(), "redo branch survives an unchanged commit");
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.is_modified());
        assert_eq!(events.borrow().from_origin(Origin::User).len(), 1);

        editor.redo().unwrap();
        assert_eq!(editor.get(0, 0).unwrap(), "Emma");
    }

    #[test]
    fn test_history_replay_does_not_record_commands() {
        let mut editor = three_books();
        let events = collect(&mut editor);

        editor.edit_cell(0, 2, "500").unwrap();
        editor.undo().unwrap();
        editor.redo().unwrap();
        editor.undo().unwrap();

        assert_eq!(editor.history().len(), 1);
        let events = events.borrow();
        assert_eq!(events.from_origin(Origin::User).len(), 1);
        assert_eq!(events.from_origin(Origin::History).len(), 3);
        assert_eq!(events.events()[0].change, TableChange::CellChanged { row: 0, col: 2 });
    }

    #[test]
    fn test_cut_copies_and_blanks_outside_history() {
        let mut editor = three_books();
        editor.mark_saved();
        let events = collect(&mut editor);

        let selection = Selection::range(0, 0, 1, 0);
        assert!(editor.cut(&selection).unwrap());

        assert_eq!(editor.clipboard().text(), "Dune");
        assert_eq!(editor.get(0, 0).unwrap(), "");
        assert_eq!(editor.get(1, 0).unwrap(), "");
        assert!(!editor.can_undo(), "cut is not undoable");
        assert!(editor.is_modified());
        assert_eq!(events.borrow().from_origin(Origin::Clipboard).len(), 2);
    }

    #[test]
    fn test_cut_with_bad_cell_changes_nothing() {
        let mut editor = three_books();
        let mut selection = Selection::new(0, 0);
        selection.add_cell(9, 0);

        assert!(editor.cut(&selection).is_err());
        assert_eq!(editor.get(0, 0).unwrap(), "Dune");
        assert_eq!(editor.clipboard().text(), "");
    }

    #[test]
    fn test_copy_paste_first_cells_only() {
        let mut editor = three_books();
        let mut source = Selection::new(2, 1);
        source.add_cell(0, 0);
        assert!(editor.copy(&source).unwrap());
        assert_eq!(editor.clipboard().text(), "Octavia Butler");

        let target = Selection::range(0, 1, 1, 1);
        assert!(editor.paste(&target).unwrap());
        assert_eq!(editor.get(0, 1).unwrap(), "Octavia Butler");
        assert_eq!(editor.get(1, 1).unwrap(), "Jane Austen");
        assert!(!editor.can_undo(), "paste is not undoable");
    }

    #[test]
    fn test_paste_bypasses_pages_gate() {
        let mut editor = Editor::new().with_clipboard(Box::new(MemoryClipboard::with_text("lots")));
        editor.add_row().unwrap();
        editor.paste(&Selection::new(0, 2)).unwrap();
        assert_eq!(editor.get(0, 2).unwrap(), "lots");
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut editor = three_books();
        let empty = Selection::empty();
        assert!(!editor.copy(&empty).unwrap());
        assert!(!editor.cut(&empty).unwrap());
        assert!(!editor.paste(&empty).unwrap());
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_modified_tracking() {
        let mut editor = three_books();
        assert!(!editor.is_modified());

        editor.add_row().unwrap();
        assert!(editor.is_modified());
        editor.undo().unwrap();
        assert!(!editor.is_modified(), "undone back to the loaded state");

        editor.edit_cell(0, 0, "x").unwrap();
        editor.mark_saved();
        assert!(!editor.is_modified());
        editor.undo().unwrap();
        assert!(editor.is_modified());
    }

    #[test]
    fn test_clear_drops_history() {
        let mut editor = three_books();
        let events = collect(&mut editor);
        editor.add_row().unwrap();
        editor.clear().unwrap();

        assert_eq!(editor.row_count(), 0);
        assert!(!editor.can_undo());
        assert!(!editor.is_modified());
        assert_eq!(
            events.borrow().events().last().map(|e| e.change.clone()),
            Some(TableChange::Reset { rows: 0 })
        );
    }

    #[test]
    fn test_out_of_range_edit_records_nothing() {
        let mut editor = three_books();
        assert_eq!(
            editor.edit_cell(3, 0, "x"),
            Err(TableError::RowOutOfRange { row: 3, rows: 3 })
        );
        assert_eq!(
            editor.set_data(0, 5, "x"),
            Err(TableError::ColumnOutOfRange { col: 5, cols: 3 })
        );
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_selected_rows_helper() {
        let mut selection = Selection::range(2, 0, 1, 2);
        selection.add_cell(2, 1);
        assert_eq!(selected_rows(&selection), vec![1, 2]);
    }
}
