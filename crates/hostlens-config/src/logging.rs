//! `tracing` setup and the in-memory log sink.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once, OnceLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_BUFFER_LINES: usize = 2_000;

/// The `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A level name or an `EnvFilter` directive list such as `warn,hostlens_resolve=trace`.
    pub level: String,
    pub json: bool,
    /// Also write to stderr.
    pub stderr: bool,
    /// Append to this file. A file that cannot be opened only disables this sink.
    pub file: Option<PathBuf>,
    /// Capacity of the in-memory buffer.
    pub buffer_lines: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            json: false,
            stderr: true,
            file: None,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

impl LoggingConfig {
    /// `level` as filter directives. Bare level names are case-insensitive and `warning` is
    /// accepted for `warn`.
    pub fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return DEFAULT_LEVEL.to_owned();
        }
        if level.eq_ignore_ascii_case("warning") {
            return "warn".to_owned();
        }
        match level.parse::<LevelFilter>() {
            Ok(filter) => filter.to_string().to_ascii_lowercase(),
            Err(_) => level.to_owned(),
        }
    }

    /// The effective filter: the configured directives with `RUST_LOG` layered on top.
    ///
    /// Falls back to `RUST_LOG` alone, then to the configured directives alone, then to `info`
    /// when a combination does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.directives();
        let from_env = std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut attempts = Vec::with_capacity(3);
        if let Some(env) = from_env {
            attempts.push(format!("{configured},{env}"));
            attempts.push(env);
        }
        attempts.push(configured);

        attempts
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

/// Bounded buffer of formatted log lines, newest last.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: Mutex::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push_line(&self, line: String) {
        let mut lines = self.lines.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Up to `n` of the newest lines, oldest first.
    pub fn last_lines(&self, n: usize) -> Vec<String> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    /// A writer for `tracing_subscriber::fmt` layers that appends to this buffer.
    pub fn make_writer(self: &Arc<Self>) -> impl for<'a> MakeWriter<'a> + Send + Sync + 'static {
        BufferSink(Arc::clone(self))
    }

    fn push_text(&self, text: &str) {
        for line in text.lines().filter(|line| !line.is_empty()) {
            self.push_line(line.to_owned());
        }
    }
}

struct BufferSink(Arc<LogBuffer>);

impl<'a> MakeWriter<'a> for BufferSink {
    type Writer = EventWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter { buffer: &self.0 }
    }
}

/// `fmt` layers hand over each formatted event in a single `write`.
struct EventWriter<'a> {
    buffer: &'a LogBuffer,
}

impl io::Write for EventWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_text(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

static INSTALL: Once = Once::new();
static BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

/// The process-wide buffer that [`init_tracing`] writes into.
pub fn global_log_buffer() -> Arc<LogBuffer> {
    Arc::clone(BUFFER.get_or_init(|| Arc::new(LogBuffer::new(DEFAULT_BUFFER_LINES))))
}

/// Install the global subscriber described by `logging` and return the buffer it writes to.
///
/// Only the first call installs anything; every call returns the same buffer.
pub fn init_tracing(logging: &LoggingConfig) -> Arc<LogBuffer> {
    let buffer = Arc::clone(BUFFER.get_or_init(|| Arc::new(LogBuffer::new(logging.buffer_lines))));
    INSTALL.call_once(|| install(logging, &buffer));
    buffer
}

fn install(logging: &LoggingConfig, buffer: &Arc<LogBuffer>) {
    let mut writer = BoxMakeWriter::new(buffer.make_writer());
    if logging.stderr {
        // Test harnesses only capture output written through `TestWriter`.
        writer = if cfg!(debug_assertions) {
            BoxMakeWriter::new(writer.and(TestWriter::with_stderr))
        } else {
            BoxMakeWriter::new(writer.and(io::stderr))
        };
    }

    let mut file_error = None;
    if let Some(path) = logging.file.as_deref() {
        match open_log_file(path) {
            Ok(file) => writer = BoxMakeWriter::new(writer.and(std::sync::Mutex::new(file))),
            Err(err) => file_error = Some(err),
        }
    }

    let fmt = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);
    let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if logging.json {
        fmt.json().boxed()
    } else {
        fmt.boxed()
    };
    let subscriber = tracing_subscriber::registry()
        .with(logging.env_filter())
        .with(layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }

    if let (Some(err), Some(path)) = (file_error, logging.file.as_ref()) {
        tracing::warn!(
            path = %path.display(),
            error = %err,
            "cannot open log file; file logging is disabled"
        );
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
