// booklist - edit tab-separated book lists from the command line

mod exit_codes;
mod logging;
mod render;
mod script;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use booklist_config::Settings;
use booklist_engine::events::TableEvent;
use booklist_engine::validation::{PAGES_MAX, PAGES_MIN};
use booklist_engine::{Editor, Row, TableError};
use booklist_io::{tsv, IoError};

use exit_codes::{
    exit_code_name, EXIT_ERROR, EXIT_IO, EXIT_SCRIPT, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATION,
};
use logging::LogHandler;
use script::{ScriptError, Session};

#[derive(Parser)]
#[command(name = "booklist")]
#[command(about = "Edit tab-separated book lists (name, author, pages) with undo/redo")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Append log records to this file (in addition to `log.file` from settings)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log debug records to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file to use instead of <config dir>/booklist/settings.json
    #[arg(long, global = true, env = "BOOKLIST_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a book list as an aligned table
    #[command(after_help = "\
Examples:
  booklist show books.txt
  booklist show books.txt --json")]
    Show {
        /// Book list file (tab-separated: name, author, pages)
        file: PathBuf,

        /// Print a JSON array of {row, name, author, pages} instead
        #[arg(long)]
        json: bool,
    },

    /// Create an empty book list
    New {
        /// File to create
        file: PathBuf,

        /// Overwrite the file if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Apply an edit script to a book list
    #[command(after_help = "\
Script commands (one per line, rows and columns count from 0):
  add                      append the new-row template
  edit ROW COL TEXT...     set a cell (column 2 must be 1..1000000000)
  delete [ROW[,ROW...]]    remove rows (the selected rows when none given)
  select ROW COL [ROW COL] select a cell or a rectangle
  copy | cut | paste       clipboard on the selection (cut/paste are not undoable)
  undo | redo              step through the history
  clear                    start over with an empty, unmodified table (save to keep it)
  show | history           print the table or the command history
  save [PATH]              write the table (to PATH, which becomes the document)

Examples:
  booklist run books.txt --script fixes.txt
  printf 'add\\nedit 3 0 Dune\\n' | booklist run books.txt --dry-run")]
    Run {
        /// Book list file to load
        file: PathBuf,

        /// Script file (default: read from stdin)
        #[arg(long, short = 's', value_name = "PATH")]
        script: Option<PathBuf>,

        /// Write the result here instead of back to FILE
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Run the script without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Suppress the summary line on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("BOOKLIST_COMMIT"), ")",
        "\nengine:  booklist-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("BOOKLIST_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return report(err),
    };
    let logger = init_logging(&settings, cli.log_file.as_deref(), cli.verbose);
    log::debug!("booklist {} started", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Show { file, json } => cmd_show(&file, json),
        Commands::New { file, force } => cmd_new(&file, force),
        Commands::Run { file, script, output, dry_run, quiet } => {
            cmd_run(&settings, file, script, output, dry_run, quiet)
        }
    };

    let exit = match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            log::error!("{}", err.message);
            log::debug!("exit code {} ({})", err.code, exit_code_name(err.code));
            report(err)
        }
    };

    if let Some(logger) = logger {
        logger.close();
    }
    exit
}

fn report(CliError { code, message, hint }: CliError) -> ExitCode {
    if !message.is_empty() {
        eprintln!("error: {}", message);
    }
    if let Some(hint) = hint {
        eprintln!("hint:  {}", hint);
    }
    ExitCode::from(code)
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(|e| {
            CliError::usage(format!("cannot load settings {}: {}", path.display(), e))
        }),
        None => Ok(Settings::load()),
    }
}

/// Build the log handler from settings and flags and install it.
/// Returns `None` if another logger is already installed.
fn init_logging(
    settings: &Settings,
    log_file: Option<&Path>,
    verbose: bool,
) -> Option<&'static LogHandler> {
    let mut level = logging::level_filter(settings.log_level);
    if verbose {
        level = level.max(log::LevelFilter::Debug);
    }

    let handler = LogHandler::new(level);
    if verbose {
        handler.add_stream(logging::stderr_sink());
    }

    let mut failures = Vec::new();
    for path in settings.log_file.as_deref().into_iter().chain(log_file) {
        if let Err(e) = handler.add_file(path) {
            failures.push(e);
        }
    }

    let installed = handler.install().ok();
    for failure in failures {
        eprintln!("warning: {}", failure);
        log::warn!("{}", failure);
    }
    installed
}

// ============================================================================
// show
// ============================================================================

fn cmd_show(file: &Path, json: bool) -> Result<(), CliError> {
    let rows = tsv::import(file)?;
    let text = if json {
        let mut text = render::render_json(&rows).map_err(|e| CliError::general(e.to_string()))?;
        text.push('\n');
        text
    } else {
        render::render_table(&rows)
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .map_err(|e| CliError::io(e.to_string()))
}

// ============================================================================
// new
// ============================================================================

fn cmd_new(file: &Path, force: bool) -> Result<(), CliError> {
    if file.exists() && !force {
        return Err(CliError::usage(format!("{} already exists", file.display()))
            .with_hint("use --force to overwrite it"));
    }
    tsv::export(&[], file)?;
    Ok(())
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    settings: &Settings,
    file: PathBuf,
    script: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    // Parse the whole file before building the editor.
    let rows = tsv::import(&file)?;

    let mut editor = Editor::new()
        .with_new_row(Row::from(settings.new_row.clone()))
        .with_history_limit(settings.effective_history_limit());
    editor.subscribe(Box::new(|event: &TableEvent| {
        log::debug!(target: "booklist::view", "{:?} {:?}", event.origin, event.change);
    }));
    editor.replace_rows(rows).map_err(CliError::from)?;

    let stdout = io::stdout();
    let mut session = Session::new(editor, file, stdout.lock()).with_dry_run(dry_run);

    let executed = match &script {
        Some(path) => {
            let reader = File::open(path).map_err(|e| {
                CliError::io(format!("cannot open script {}: {}", path.display(), e))
            })?;
            session.run(BufReader::new(reader))?
        }
        None => session.run(io::stdin().lock())?,
    };
    log::info!("Executed {} script command(s)", executed);

    let modified = session.editor().is_modified();
    let target = output.as_deref().unwrap_or(session.path()).to_path_buf();
    let rows = session.editor().row_count();

    if dry_run {
        if !quiet {
            eprintln!(
                "dry run: {} command(s), {} row(s), nothing written{}",
                executed,
                rows,
                if modified { " (table modified)" } else { "" }
            );
        }
        return Ok(());
    }

    if output.is_some() || modified {
        tsv::export(session.editor().rows(), &target)?;
        if !quiet {
            eprintln!("Saved {} row(s) to {}", rows, target.display());
        }
    } else if !quiet {
        eprintln!("No changes to save");
    }
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        Self::io(err.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        Self::general(err.to_string())
    }
}

impl From<ScriptError> for CliError {
    fn from(err: ScriptError) -> Self {
        let message = err.to_string();
        match err {
            ScriptError::Input(_) | ScriptError::Io { .. } | ScriptError::Output(_) => {
                Self::io(message)
            }
            ScriptError::Parse { .. } => Self { code: EXIT_SCRIPT, message, hint: None }
                .with_hint("run `booklist run --help` for the script commands"),
            ScriptError::Table { .. } => Self { code: EXIT_SCRIPT, message, hint: None }
                .with_hint("rows and columns are numbered from 0; use `show` to list them"),
            ScriptError::Pages { .. } => Self { code: EXIT_VALIDATION, message, hint: None }
                .with_hint(format!("pages must be a whole number from {} to {}", PAGES_MIN, PAGES_MAX)),
        }
    }
}
