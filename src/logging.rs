//! `tracing` subscriber installation.
//!
//! Events always go to stderr. When a log file is supplied, the same events
//! are appended to it without ANSI colouring.

use cap_std::fs_utf8::{Dir, OpenOptions};
use std::fs::File;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors raised while installing the subscriber.
#[derive(Debug, Clone, Error)]
pub enum LoggingError {
    /// The filter directive does not parse.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// Directive that failed.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// The log file could not be opened for appending.
    #[error("failed to open log file '{file}': {message}")]
    OpenFile {
        /// File that failed to open.
        file: String,
        /// I/O error text.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the filter, preferring `RUST_LOG` over `fallback`.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when `RUST_LOG` is unset and
/// `fallback` does not parse.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(fallback).map_err(|error| LoggingError::InvalidFilter {
            filter: fallback.to_owned(),
            message: error.to_string(),
        })
    })
}

/// Opens `file` inside `dir` for appending, creating it if missing.
///
/// # Errors
///
/// Returns [`LoggingError::OpenFile`] when the file cannot be opened.
pub fn open_log_file(dir: &Dir, file: &str) -> Result<File, LoggingError> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    dir.open_with(file, &options)
        .map(cap_std::fs_utf8::File::into_std)
        .map_err(|error| LoggingError::OpenFile {
            file: file.to_owned(),
            message: error.to_string(),
        })
}

/// Installs a global subscriber writing to stderr and, optionally, `log_file`.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(fallback: &str, log_file: Option<File>) -> Result<(), LoggingError> {
    let filter = build_filter(fallback)?;
    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|error| LoggingError::Install(error.to_string()))
}
