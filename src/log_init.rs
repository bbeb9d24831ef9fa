//! Logging for the command line.
//!
//! Records go to a file when `--log` is given and to stderr otherwise. The
//! level comes from `--log-level`, then `WINDCRAFT_LOG`, then a default of
//! `debug` for files and `warn` for stderr.

use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable holding the log level.
pub const LEVEL_ENV: &str = "WINDCRAFT_LOG";

enum Sink {
    Stderr,
    File(PathBuf),
}

struct CliLogger {
    sink: Sink,
    level: LevelFilter,
}

impl CliLogger {
    /// `[LEVEL crate] message`, naming the crate the record came from.
    fn line(record: &Record) -> String {
        let source = record.target().split("::").next().unwrap_or_default();
        format!("[{} {}] {}", record.level(), source, record.args())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::line(record);
        match &self.sink {
            Sink::Stderr => eprintln!("{line}"),
            Sink::File(path) => {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "{line}");
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Picks the level: an explicit flag, then the environment value, then
/// `default`. Unparsable environment values are ignored.
pub fn resolve_level(flag: Option<LevelFilter>, env: Option<&str>, default: LevelFilter) -> LevelFilter {
    flag.or_else(|| env.and_then(|value| value.trim().parse().ok()))
        .unwrap_or(default)
}

/// Installs the process logger, writing to `file` or to stderr.
pub fn init_logger(file: Option<&Path>, level: Option<LevelFilter>) -> Result<(), log::SetLoggerError> {
    let (sink, default) = match file {
        Some(path) => (Sink::File(path.to_path_buf()), LevelFilter::Debug),
        None => (Sink::Stderr, LevelFilter::Warn),
    };
    let env = std::env::var(LEVEL_ENV).ok();
    let level = resolve_level(level, env.as_deref(), default);

    log::set_boxed_logger(Box::new(CliLogger { sink, level }))?;
    log::set_max_level(level);
    Ok(())
}
