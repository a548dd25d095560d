//! Undo/Redo history for table commands
//!
//! A linear list of commands plus a cursor. Commands below the cursor have
//! been applied in order; commands at or above it are the redo branch.

use crate::command::Command;
use crate::error::TableError;
use crate::table::TableStore;

#[derive(Debug, Clone)]
pub struct UndoStack {
    commands: Vec<Command>,
    index: usize,
    /// Cursor position matching the last save, if still reachable.
    clean_index: Option<usize>,
    /// Maximum number of commands kept (0 = unlimited).
    limit: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: 0,
            clean_index: Some(0),
            limit: 0,
        }
    }

    /// History capped at `limit` commands; the oldest are dropped first.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit, ..Self::new() }
    }

    /// Run `command` forward and record it.
    ///
    /// The redo branch is discarded. If the command fails to apply, nothing
    /// is recorded and the history is left as it was.
    pub fn push<S: TableStore + ?Sized>(&mut self, command: Command, store: &mut S) -> Result<(), TableError> {
        command.apply(store)?;

        if self.index < self.commands.len() {
            self.commands.truncate(self.index);
            if self.clean_index.is_some_and(|clean| clean > self.index) {
                self.clean_index = None;
            }
        }
        self.commands.push(command);
        self.index += 1;

        if self.limit > 0 && self.commands.len() > self.limit {
            self.commands.remove(0);
            self.index -= 1;
            self.clean_index = self.clean_index.and_then(|clean| clean.checked_sub(1));
        }
        Ok(())
    }

    /// Revert the last applied command. Returns false if there was nothing to undo.
    pub fn undo<S: TableStore + ?Sized>(&mut self, store: &mut S) -> Result<bool, TableError> {
        if self.index == 0 {
            return Ok(false);
        }
        self.commands[self.index - 1].revert(store)?;
        self.index -= 1;
        Ok(true)
    }

    /// Re-apply the next command in the redo branch. Returns false if there was none.
    pub fn redo<S: TableStore + ?Sized>(&mut self, store: &mut S) -> Result<bool, TableError> {
        if self.index == self.commands.len() {
            return Ok(false);
        }
        self.commands[self.index].apply(store)?;
        self.index += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    /// Description of the command `undo` would revert.
    pub fn undo_text(&self) -> Option<String> {
        self.index.checked_sub(1).map(|i| self.commands[i].text())
    }

    /// Description of the command `redo` would apply.
    pub fn redo_text(&self) -> Option<String> {
        self.commands.get(self.index).map(Command::text)
    }

    /// Number of recorded commands (applied and redoable).
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Cursor: how many commands are currently applied.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Mark the current position as matching the saved document.
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    /// Forget everything. The empty history counts as clean.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.index = 0;
        self.clean_index = Some(0);
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
