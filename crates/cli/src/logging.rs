//! Multi-sink text logger behind the `log` facade.
//!
//! `main` builds one [`LogHandler`], attaches its sinks, then installs it.
//! Every record is written to every sink as
//! `yyyy-MM-dd hh:mm:ss.zzz LVL target: message`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use booklist_config::settings::LogLevel;

type Sink = Box<dyn Write + Send>;

pub struct LogHandler {
    level: LevelFilter,
    sinks: Mutex<Vec<Sink>>,
}

impl LogHandler {
    pub fn new(level: LevelFilter) -> Self {
        Self { level, sinks: Mutex::new(Vec::new()) }
    }

    pub fn add_stream(&self, sink: Sink) {
        self.sinks.lock().push(sink);
    }

    /// Append to `path`, creating missing parent directories. On failure no
    /// sink is added and the reason is returned for the caller to report.
    pub fn add_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                format!("Failed to create log directory {}: {}", parent.display(), e)
            })?;
        }

        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("Could not open file {} for writing: {}", path.display(), e))?;
        self.add_stream(Box::new(file));
        Ok(())
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Flush and drop every sink. Records logged afterwards go nowhere.
    pub fn close(&self) {
        let mut sinks = self.sinks.lock();
        for sink in sinks.iter_mut() {
            let _ = sink.flush();
        }
        sinks.clear();
    }

    /// Register as the global logger. The handler lives for the rest of the
    /// process; the returned reference is used to close it on exit.
    pub fn install(self) -> Result<&'static LogHandler, log::SetLoggerError> {
        let handler: &'static LogHandler = Box::leak(Box::new(self));
        log::set_logger(handler)?;
        log::set_max_level(handler.level);
        Ok(handler)
    }
}

impl Log for LogHandler {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        let mut sinks = self.sinks.lock();
        for sink in sinks.iter_mut() {
            // A sink that stops accepting writes must not take the others down.
            let _ = sink.write_all(line.as_bytes()).and_then(|_| sink.flush());
        }
    }

    fn flush(&self) {
        for sink in self.sinks.lock().iter_mut() {
            let _ = sink.flush();
        }
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "{} {} {}: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level_code(record.level()),
        record.target(),
        record.args()
    )
}

fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "CRT",
        Level::Warn => "WRN",
        Level::Info => "INF",
        Level::Debug | Level::Trace => "DBG",
    }
}

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::Off,
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Stderr sink used by `--verbose`.
pub fn stderr_sink() -> Sink {
    Box::new(io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    /// In-memory sink shared with the test.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn emit(handler: &LogHandler, level: Level, message: &str) {
        handler.log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(level)
                .target("booklist")
                .build(),
        );
    }

    #[test]
    fn test_line_format() {
        let handler = LogHandler::new(LevelFilter::Trace);
        let buffer = Buffer::default();
        handler.add_stream(Box::new(buffer.clone()));

        emit(&handler, Level::Info, "Loaded 3 row(s)");
        emit(&handler, Level::Error, "boom");

        let text = buffer.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" INF booklist: Loaded 3 row(s)"), "{}", lines[0]);
        assert!(lines[1].ends_with(" CRT booklist: boom"));

        // "2026-01-31 09:05:07.123 " is 24 characters
        let stamp = &lines[0][..23];
        assert_eq!(stamp.len(), 23);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[19..20], ".");
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(level_code(Level::Debug), "DBG");
        assert_eq!(level_code(Level::Trace), "DBG");
        assert_eq!(level_code(Level::Warn), "WRN");
    }

    #[test]
    fn test_level_filtering() {
        let handler = LogHandler::new(LevelFilter::Warn);
        let buffer = Buffer::default();
        handler.add_stream(Box::new(buffer.clone()));

        emit(&handler, Level::Info, "hidden");
        emit(&handler, Level::Warn, "shown");

        let text = buffer.contents();
        assert!(!text.contains("hidden"));
        assert!(text.contains("WRN booklist: shown"));
    }

    #[test]
    fn test_every_sink_receives_each_record() {
        let handler = LogHandler::new(LevelFilter::Info);
        let first = Buffer::default();
        let second = Buffer::default();
        handler.add_stream(Box::new(first.clone()));
        handler.add_stream(Box::new(second.clone()));

        emit(&handler, Level::Info, "hello");
        assert_eq!(first.contents(), second.contents());
        assert!(first.contents().contains("hello"));
    }

    #[test]
    fn test_add_file_creates_directories_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs/nested/booklist.log");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "earlier line\n").unwrap();

        let handler = LogHandler::new(LevelFilter::Info);
        handler.add_file(&path).unwrap();
        emit(&handler, Level::Info, "appended");
        handler.close();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier line\n"));
        assert!(text.contains("INF booklist: appended"));

        let fresh = dir.path().join("a/b/c.log");
        let handler = LogHandler::new(LevelFilter::Info);
        handler.add_file(&fresh).unwrap();
        assert!(fresh.exists());
    }

    #[test]
    fn test_add_file_failure_skips_sink() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened as a log file.
        let handler = LogHandler::new(LevelFilter::Info);
        let err = handler.add_file(dir.path()).unwrap_err();
        assert!(err.contains("Could not open file"));
        assert_eq!(handler.sink_count(), 0);
    }

    #[test]
    fn test_close_drops_sinks() {
        let handler = LogHandler::new(LevelFilter::Info);
        let buffer = Buffer::default();
        handler.add_stream(Box::new(buffer.clone()));
        handler.close();
        emit(&handler, Level::Info, "after close");
        assert!(buffer.contents().is_empty());
        assert_eq!(handler.sink_count(), 0);
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Off), LevelFilter::Off);
        assert_eq!(level_filter(LogLevel::Info), LevelFilter::Info);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::Trace);
    }
}
