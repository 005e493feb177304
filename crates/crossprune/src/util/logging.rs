use crate::error::{CrossPruneError, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Writes every byte to both inner writers.
pub struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Console stream for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    /// Machine-readable output owns stdout, so logs move to stderr.
    pub fn for_output(json: bool) -> Self {
        if json {
            LogStream::Stderr
        } else {
            LogStream::Stdout
        }
    }

    fn writer(self) -> Box<dyn Write + Send> {
        match self {
            LogStream::Stdout => Box::new(io::stdout()),
            LogStream::Stderr => Box::new(io::stderr()),
        }
    }

    fn target(self) -> Target {
        match self {
            LogStream::Stdout => Target::Stdout,
            LogStream::Stderr => Target::Stderr,
        }
    }
}

/// Installs the global logger on `stream`. `RUST_LOG` overrides the default
/// level; when `log_file` is set, lines also go to that file in append mode.
pub fn init_logging(verbose: bool, stream: LogStream, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{:<5}] {}",
            buf.timestamp_seconds(),
            record.level(),
            record.args()
        )
    });

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CrossPruneError::Config(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            builder.target(Target::Pipe(Box::new(TeeWriter::new(stream.writer(), file))));
        }
        None => {
            builder.target(stream.target());
        }
    }

    builder
        .try_init()
        .map_err(|e| CrossPruneError::Config(format!("Failed to initialize logger: {}", e)))?;

    if let Some(path) = log_file {
        log::info!("Logging to file: {}", path.display());
    }

    Ok(())
}
