use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;

use tracing::Level;

static LOG_FILE: OnceLock<File> = OnceLock::new();

/// Destination of one formatted event: the log file once one is installed,
/// stderr before that.
pub enum LogWriter {
    File(&'static File),
    Stderr(io::Stderr),
}

impl LogWriter {
    fn current() -> Self {
        match LOG_FILE.get() {
            Some(file) => LogWriter::File(file),
            None => LogWriter::Stderr(io::stderr()),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(file) => file.write(buf),
            LogWriter::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(file) => file.flush(),
            LogWriter::Stderr(stderr) => stderr.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LogMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter::current()
    }
}

/// Install the global subscriber. Output is appended to `log_file` when one
/// is given and goes to stderr otherwise. Only the first call installs
/// anything.
pub fn init(level: Level, log_file: Option<&Path>) -> io::Result<()> {
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let _ = LOG_FILE.set(file);
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(LogMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(log_file.is_none())
        .try_init();
    Ok(())
}
