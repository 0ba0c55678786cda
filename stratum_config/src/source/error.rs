//! Errors raised while collecting and reading sources.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while collecting or reading configuration sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// A prefixed environment variable has an empty path segment.
    #[error("malformed environment variable '{name}': empty path segment")]
    MalformedEnvironment {
        /// Variable name.
        name: String,
    },
    /// A command-line flag has an empty path segment or lacks a value.
    #[error("malformed argument '{arg}': {reason}")]
    MalformedArgument {
        /// Offending argument.
        arg: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A referenced file's format could not be determined.
    #[error("cannot determine the format of '{path}'; name it with `config.file.<format>`")]
    UnknownFormat {
        /// Referenced path.
        path: Utf8PathBuf,
    },
    /// A stdin reference was declared but no stdin stream is available.
    #[error("a stdin reference was declared but no stdin stream is available")]
    StdinUnavailable,
    /// A file could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFile {
        /// Referenced path.
        path: Utf8PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A stream could not be read.
    #[error("failed to read stdin: {0}")]
    ReadStream(#[source] std::io::Error),
}
