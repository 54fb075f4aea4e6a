//! `env_logger` setup for the two command modes.
//!
//! `RUST_LOG` always wins. Without it, the dashboard logs nothing unless a
//! `--log-file` is given (stderr would tear the alternate screen), and the
//! one-shot `fetch` command logs warnings to stderr.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};

/// Where log records end up.
pub enum Sink {
    Stderr,
    File(File),
}

/// Logging for `hwdash monitor`.
pub fn init_monitor(log_file: Option<&Path>) -> io::Result<()> {
    let (default_filter, sink) = match log_file {
        Some(path) => ("info", Sink::File(open_log(path)?)),
        None => ("off", Sink::Stderr),
    };
    install(builder(Env::default().default_filter_or(default_filter), sink));
    Ok(())
}

/// Logging for `hwdash fetch`.
pub fn init_fetch() {
    install(builder(
        Env::default().default_filter_or("warn"),
        Sink::Stderr,
    ));
}

pub fn builder(env: Env<'_>, sink: Sink) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    if let Sink::File(file) = sink {
        builder
            .target(Target::Pipe(Box::new(file)))
            .write_style(WriteStyle::Never);
    }
    builder
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn install(mut builder: Builder) {
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}
