//! Error types for featex.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for featex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for featex operations.
///
/// Parse-time errors name the offending file, line or argument so that a
/// failed model build can be diagnosed from the message alone.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A processor received the wrong number of configuration arguments.
    #[error("invalid configuration: {0}")]
    ConfigArity(String),

    /// An integer argument could not be parsed.
    #[error("invalid integer '{value}' for {what}")]
    BadInteger {
        /// What the integer was supposed to configure.
        what: &'static str,
        /// The offending argument text.
        value: String,
    },

    /// A resource file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// A resource file contains a malformed line.
    #[error("malformed line {line} in {}: {message}", path.display())]
    FileFormat {
        /// Path of the file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A form appears more than once in a Brown cluster file.
    #[error("form '{form}' is present twice in Brown cluster file {}", path.display())]
    DuplicateKey {
        /// Path of the cluster file.
        path: PathBuf,
        /// The duplicated form.
        form: String,
    },

    /// An entity type label could not be registered or resolved.
    #[error("unknown entity type '{0}'")]
    UnknownEntityType(String),

    /// The factory does not recognize the requested processor name.
    #[error("unknown feature processor '{0}'")]
    UnknownProcessorName(String),

    /// A processor was configured with an unsupported window.
    #[error("window constraint violated: {0}")]
    WindowConstraint(String),

    /// IO error while reading or writing a model.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A string inside a model file is not valid UTF-8.
    #[error("malformed UTF-8 in model: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
