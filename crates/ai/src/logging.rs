//! Logging setup of the AI client.
//!
//! Records go through the [`log`] facade and are written by [`env_logger`]. The default
//! filter only lets warnings and errors through and can be overridden with `RUST_LOG`.

use {
    anyhow::Context,
    env_logger::{Target, WriteStyle},
    log::LevelFilter,
    std::{
        fs::{self, File, OpenOptions},
        io::{self, Write},
        path::{Path, PathBuf},
        time::{SystemTime, UNIX_EPOCH},
    },
};

/// The directory in which log files are created, relative to the working directory.
pub const LOG_DIRECTORY: &str = "log";

/// Where log records are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum LogMode {
    /// Records are written to the standard error.
    #[default]
    Console,
    /// Records are appended to a file in [`LOG_DIRECTORY`].
    File,
    /// Records are written both to the standard error and to a file.
    Both,
    /// Logging is disabled.
    #[value(name = "none")]
    Silent,
}

/// Installs the global logger for the provided mode.
///
/// This must be called at most once per process.
pub fn init(mode: LogMode) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();

    match mode {
        LogMode::Silent => {
            builder.filter_level(LevelFilter::Off);
        }
        LogMode::Console => {
            builder
                .filter_level(LevelFilter::Warn)
                .parse_default_env()
                .target(Target::Stderr);
        }
        LogMode::File | LogMode::Both => {
            let path = log_file_path(Path::new(LOG_DIRECTORY), SystemTime::now());
            let file = open_log_file(&path)?;

            let target: Box<dyn Write + Send> = if mode == LogMode::Both {
                Box::new(Tee(file, io::stderr()))
            } else {
                Box::new(file)
            };

            builder
                .filter_level(LevelFilter::Info)
                .parse_default_env()
                .write_style(WriteStyle::Never)
                .target(Target::Pipe(target));
        }
    }

    builder.try_init().context("A logger is already installed")?;
    Ok(())
}

/// Returns the path of the log file created at `now` in `directory`.
pub fn log_file_path(directory: &Path, now: SystemTime) -> PathBuf {
    let timestamp = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    directory.join(format!("app_{}.log", timestamp.as_secs()))
}

/// Opens the log file at `path` in append mode, creating its parent directory if needed.
pub fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory `{}`", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file `{}`", path.display()))
}

/// A writer that duplicates everything written to it.
struct Tee<A, B>(A, B);

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        self.1.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}
