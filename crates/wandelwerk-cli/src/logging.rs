// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log file setup. Events go to an append-only file through a non-blocking
// writer; `--verbose` mirrors them to stderr.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global subscriber. The returned guard flushes the log file
/// when dropped, so it must live until the end of `main`.
pub fn init(log_file: &Path, verbose: bool) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(open_appender(log_file)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = verbose.then(|| fmt::layer().with_writer(io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer(writer))
        .with(stderr_layer)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(guard)
}

/// Open `log_file` for appending; existing lines are kept.
fn open_appender(log_file: &Path) -> Result<RollingFileAppender> {
    let directory = log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file path {} has no file name", log_file.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .with_context(|| format!("cannot open log file {}", log_file.display()))
}

/// One plain-text line per event: timestamp, level, message and fields.
fn file_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
}
