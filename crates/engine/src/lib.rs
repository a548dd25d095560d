pub mod clipboard;
pub mod command;
pub mod editor;
pub mod error;
pub mod events;
pub mod history;
pub mod table;
pub mod validation;

pub use command::Command;
pub use editor::Editor;
pub use error::TableError;
pub use history::UndoStack;
pub use table::{BookTable, Row, TableStore, COLUMN_COUNT};
