//! Line-oriented edit scripts for `booklist run`.
//!
//! One command per line; blank lines and lines starting with `#` are
//! skipped. Rows and columns are numbered from 0 (columns: 0 name,
//! 1 author, 2 pages).
//!
//! ```text
//! add
//! edit 0 0 Dune
//! edit 0 2 412
//! select 0 0 1 2
//! delete 3,4
//! undo
//! save books-copy.txt
//! ```

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use booklist_core::{CellRef, Selection};
use booklist_engine::validation::{validate_pages, PagesError, PAGES_COLUMN};
use booklist_engine::{Editor, TableError};
use booklist_io::{tsv, IoError};

use crate::render::render_table;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Add,
    Edit { row: usize, col: usize, text: String },
    /// Explicit rows, or the rows of the current selection when empty.
    Delete(Vec<usize>),
    Select { from: CellRef, to: CellRef },
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    Clear,
    Show,
    History,
    Save(Option<PathBuf>),
}

#[derive(Debug)]
pub enum ScriptError {
    /// The script itself could not be read.
    Input(String),
    Parse { line: usize, message: String },
    Table { line: usize, source: TableError },
    Pages { line: usize, source: PagesError },
    Io { line: usize, source: IoError },
    /// Writing `show`/`history` output failed.
    Output(String),
}

impl ScriptError {
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. }
            | Self::Table { line, .. }
            | Self::Pages { line, .. }
            | Self::Io { line, .. } => Some(*line),
            Self::Input(_) | Self::Output(_) => None,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(message) => write!(f, "cannot read script: {message}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::Table { line, source } => write!(f, "line {line}: {source}"),
            Self::Pages { line, source } => write!(f, "line {line}: {source}"),
            Self::Io { line, source } => write!(f, "line {line}: {source}"),
            Self::Output(message) => write!(f, "cannot write output: {message}"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Step>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = next_word(line);
    let step = match word.to_ascii_lowercase().as_str() {
        "add" => no_args(Step::Add, word, rest)?,
        "edit" => {
            let (row, rest) = next_word(rest);
            let (col, rest) = next_word(rest);
            Step::Edit {
                row: parse_index(row, "row")?,
                col: parse_index(col, "column")?,
                text: rest.trim().to_string(),
            }
        }
        "delete" => {
            let rows = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| parse_index(s, "row"))
                .collect::<Result<Vec<_>, _>>()?;
            Step::Delete(rows)
        }
        "select" => {
            let numbers = rest
                .split_whitespace()
                .map(|s| parse_index(s, "index"))
                .collect::<Result<Vec<_>, _>>()?;
            match numbers.as_slice() {
                [row, col] => Step::Select {
                    from: CellRef::new(*row, *col),
                    to: CellRef::new(*row, *col),
                },
                [r1, c1, r2, c2] => Step::Select {
                    from: CellRef::new(*r1, *c1),
                    to: CellRef::new(*r2, *c2),
                },
                _ => return Err("select expects ROW COL [ROW COL]".to_string()),
            }
        }
        "copy" => no_args(Step::Copy, word, rest)?,
        "cut" => no_args(Step::Cut, word, rest)?,
        "paste" => no_args(Step::Paste, word, rest)?,
        "undo" => no_args(Step::Undo, word, rest)?,
        "redo" => no_args(Step::Redo, word, rest)?,
        "clear" => no_args(Step::Clear, word, rest)?,
        "show" => no_args(Step::Show, word, rest)?,
        "history" => no_args(Step::History, word, rest)?,
        "save" => {
            let path = rest.trim();
            Step::Save((!path.is_empty()).then(|| PathBuf::from(path)))
        }
        _ => return Err(format!("unknown command '{}'", word)),
    };
    Ok(Some(step))
}

fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

fn no_args(step: Step, word: &str, rest: &str) -> Result<Step, String> {
    if rest.trim().is_empty() {
        Ok(step)
    } else {
        Err(format!("{} takes no arguments", word))
    }
}

fn parse_index(word: &str, what: &str) -> Result<usize, String> {
    if word.is_empty() {
        return Err(format!("missing {} number", what));
    }
    word.parse()
        .map_err(|_| format!("expected a {} number, got '{}'", what, word))
}

/// An editor plus the state a script drives it with: the current selection
/// and the document path.
pub struct Session<W: Write> {
    editor: Editor,
    selection: Selection,
    path: PathBuf,
    out: W,
    dry_run: bool,
}

impl<W: Write> Session<W> {
    pub fn new(editor: Editor, path: PathBuf, out: W) -> Self {
        Self {
            editor,
            selection: Selection::empty(),
            path,
            out,
            dry_run: false,
        }
    }

    /// `save` steps report what they would write instead of writing it.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current document path; `save PATH` moves it.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute every line of `script`, stopping at the first failure.
    /// Returns the number of commands executed.
    pub fn run<R: BufRead>(&mut self, script: R) -> Result<usize, ScriptError> {
        let mut executed = 0;
        for (i, line) in script.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|e| ScriptError::Input(e.to_string()))?;
            let step = parse_line(&line)
                .map_err(|message| ScriptError::Parse { line: line_no, message })?;
            if let Some(step) = step {
                log::debug!("line {}: {:?}", line_no, step);
                self.execute(line_no, step)?;
                executed += 1;
            }
        }
        Ok(executed)
    }

    pub fn execute(&mut self, line: usize, step: Step) -> Result<(), ScriptError> {
        let table = |source| ScriptError::Table { line, source };

        match step {
            Step::Add => self.editor.add_row().map_err(table)?,
            Step::Edit { row, col, text } => {
                self.editor.get(row, col).map_err(table)?;
                if col == PAGES_COLUMN {
                    validate_pages(&text).map_err(|source| ScriptError::Pages { line, source })?;
                }
                self.editor.edit_cell(row, col, &text).map_err(table)?;
            }
            Step::Delete(rows) => {
                let removed = if rows.is_empty() {
                    self.editor.delete_selected_rows(&self.selection).map_err(table)?
                } else {
                    self.editor.delete_rows(rows).map_err(table)?
                };
                if removed {
                    // Indices in the old selection no longer mean the same rows.
                    self.selection.clear();
                } else {
                    log::info!("line {}: nothing to delete", line);
                }
            }
            Step::Select { from, to } => {
                self.selection = Selection::range(from.row, from.col, to.row, to.col);
            }
            Step::Copy => {
                if !self.editor.copy(&self.selection).map_err(table)? {
                    log::info!("line {}: nothing selected to copy", line);
                }
            }
            Step::Cut => {
                if !self.editor.cut(&self.selection).map_err(table)? {
                    log::info!("line {}: nothing selected to cut", line);
                }
            }
            Step::Paste => {
                if !self.editor.paste(&self.selection).map_err(table)? {
                    log::info!("line {}: nothing selected to paste into", line);
                }
            }
            Step::Undo => {
                if !self.editor.undo().map_err(table)? {
                    log::info!("line {}: nothing to undo", line);
                }
            }
            Step::Redo => {
                if !self.editor.redo().map_err(table)? {
                    log::info!("line {}: nothing to redo", line);
                }
            }
            Step::Clear => {
                self.editor.clear().map_err(table)?;
                self.selection.clear();
            }
            Step::Show => {
                let text = render_table(self.editor.rows());
                self.write_out(&text)?;
            }
            Step::History => {
                let text = render_history(&self.editor);
                self.write_out(&text)?;
            }
            Step::Save(path) => {
                let target = path.unwrap_or_else(|| self.path.clone());
                if self.dry_run {
                    log::info!("line {}: dry run, not saving to {}", line, target.display());
                } else {
                    tsv::export(self.editor.rows(), &target)
                        .map_err(|source| ScriptError::Io { line, source })?;
                    self.editor.mark_saved();
                    self.path = target;
                }
            }
        }
        Ok(())
    }

    fn write_out(&mut self, text: &str) -> Result<(), ScriptError> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ScriptError::Output(e.to_string()))
    }
}

/// Numbered command list; `*` marks commands currently applied.
fn render_history(editor: &Editor) -> String {
    let history = editor.history();
    if history.is_empty() {
        return "(no history)\n".to_string();
    }
    history
        .commands()
        .iter()
        .enumerate()
        .map(|(i, command)| {
            let marker = if i < history.index() { '*' } else { ' ' };
            format!("{} {}. {}\n", marker, i + 1, command.text())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklist_engine::Row;
    use std::fs;
    use tempfile::tempdir;

    fn session(rows: Vec<Row>) -> Session<Vec<u8>> {
        let mut editor = Editor::new().with_new_row(Row::new("New book", "Author", "1"));
        editor.replace_rows(rows).unwrap();
        Session::new(editor, PathBuf::from("books.txt"), Vec::new())
    }

    fn books() -> Vec<Row> {
        vec![
            Row::new("Dune", "Frank Herbert", "412"),
            Row::new("Emma", "Jane Austen", "474"),
            Row::new("Ulysses", "James Joyce", "730"),
        ]
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("  # comment").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("ADD").unwrap(), Some(Step::Add));
        assert_eq!(
            parse_line("edit 1 0   The Left Hand of Darkness ").unwrap(),
            Some(Step::Edit { row: 1, col: 0, text: "The Left Hand of Darkness".to_string() })
        );
        assert_eq!(
            parse_line("edit 0 1").unwrap(),
            Some(Step::Edit { row: 0, col: 1, text: String::new() })
        );
        assert_eq!(parse_line("delete 0, 2 ,5").unwrap(), Some(Step::Delete(vec![0, 2, 5])));
        assert_eq!(parse_line("delete").unwrap(), Some(Step::Delete(Vec::new())));
        assert_eq!(
            parse_line("select 2 1").unwrap(),
            Some(Step::Select { from: CellRef::new(2, 1), to: CellRef::new(2, 1) })
        );
        assert_eq!(
            parse_line("save out dir/books.txt").unwrap(),
            Some(Step::Save(Some(PathBuf::from("out dir/books.txt"))))
        );
        assert_eq!(parse_line("save").unwrap(), Some(Step::Save(None)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("frobnicate").unwrap_err().contains("unknown command"));
        assert!(parse_line("edit x 0 a").unwrap_err().contains("got 'x'"));
        assert!(parse_line("edit 0").unwrap_err().contains("missing column"));
        assert!(parse_line("select 1 2 3").is_err());
        assert!(parse_line("undo now").unwrap_err().contains("no arguments"));
        assert!(parse_line("delete -1").is_err());
    }

    #[test]
    fn test_add_edit_undo_scenario() {
        let mut s = session(Vec::new());
        let executed = s.run("add\nedit 0 0 Dune\n".as_bytes()).unwrap();
        assert_eq!(executed, 2);
        assert_eq!(s.editor().get(0, 0).unwrap(), "Dune");

        s.run("undo\n".as_bytes()).unwrap();
        assert_eq!(s.editor().get(0, 0).unwrap(), "New book");
        s.run("undo\nundo\n".as_bytes()).unwrap();
        assert_eq!(s.editor().row_count(), 0);
    }

    #[test]
    fn test_delete_explicit_and_selected() {
        let mut s = session(books());
        s.run("delete 0,2\n".as_bytes()).unwrap();
        assert_eq!(s.editor().rows(), &[Row::new("Emma", "Jane Austen", "474")]);
        s.run("undo\n".as_bytes()).unwrap();
        assert_eq!(s.editor().rows(), books().as_slice());

        s.run("select 1 0 2 2\ndelete\n".as_bytes()).unwrap();
        assert_eq!(s.editor().rows(), &[Row::new("Dune", "Frank Herbert", "412")]);
        assert!(s.selection().is_empty());

        // Nothing selected: a no-op, not an error.
        s.run("delete\n".as_bytes()).unwrap();
        assert_eq!(s.editor().row_count(), 1);
    }

    #[test]
    fn test_pages_gate_rejects_bad_input() {
        let mut s = session(books());
        let err = s.run("edit 0 2 412\nedit 0 2 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::Pages { line: 2, source: PagesError::OutOfRange }));

        let err = s.run("edit 0 2 12.5".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::Pages { source: PagesError::FractionalNotAllowed, .. }));

        // Other columns take any text.
        s.run("edit 0 1 0".as_bytes()).unwrap();
        assert_eq!(s.editor().get(0, 1).unwrap(), "0");
        assert_eq!(s.editor().get(0, 2).unwrap(), "412");
    }

    #[test]
    fn test_out_of_range_reports_line() {
        let mut s = session(books());
        let err = s.run("# header\n\nedit 9 0 x\n".as_bytes()).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, ScriptError::Table { .. }));
        assert!(err.to_string().starts_with("line 3: "));

        let err = s.run("edit 0 3 x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::Table { source: TableError::ColumnOutOfRange { .. }, .. }));
        assert!(!s.editor().is_modified());
    }

    #[test]
    fn test_cut_and_paste_bypass_history() {
        let mut s = session(books());
        s.run("select 0 0\ncut\nselect 2 0\npaste\n".as_bytes()).unwrap();
        assert_eq!(s.editor().get(0, 0).unwrap(), "");
        assert_eq!(s.editor().get(2, 0).unwrap(), "Dune");
        assert!(!s.editor().can_undo());
        assert!(s.editor().is_modified());
    }

    #[test]
    fn test_copy_with_nothing_selected_is_noop() {
        let mut s = session(books());
        s.run("copy\npaste\n".as_bytes()).unwrap();
        assert_eq!(s.editor().rows(), books().as_slice());
    }

    #[test]
    fn test_show_and_history_write_output() {
        let mut s = session(books());
        s.run("add\ndelete 0\nundo\nshow\nhistory\n".as_bytes()).unwrap();
        let text = output(&s);
        assert!(text.contains("Ulysses"));
        assert!(text.contains("New book"));
        assert!(text.contains("* 1. Add Row\n"));
        assert!(text.contains("  2. Remove Row\n"));
    }

    #[test]
    fn test_clear_empties_table_and_history() {
        let mut s = session(books());
        s.run("add\nclear\nhistory\n".as_bytes()).unwrap();
        assert_eq!(s.editor().row_count(), 0);
        assert!(!s.editor().can_undo());
        assert!(output(&s).ends_with("(no history)\n"));
    }

    #[test]
    fn test_save_writes_and_marks_clean() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("copy.txt");
        let mut s = session(books());
        let script = format!("edit 0 0 Dune Messiah\nsave {}\n", target.display());
        s.run(script.as_bytes()).unwrap();

        assert!(!s.editor().is_modified());
        assert_eq!(s.path(), target.as_path());
        let text = fs::read_to_string(&target).unwrap();
        assert!(text.starts_with("Dune Messiah\tFrank Herbert\t412\n"));
    }

    #[test]
    fn test_dry_run_save_writes_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("copy.txt");
        let mut s = session(books()).with_dry_run(true);
        s.run(format!("add\nsave {}\n", target.display()).as_bytes()).unwrap();
        assert!(!target.exists());
        assert!(s.editor().is_modified());
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing/dir/copy.txt");
        let mut s = session(books());
        let err = s.run(format!("save {}\n", target.display()).as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::Io { line: 1, .. }));
    }
}
