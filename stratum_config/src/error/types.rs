//! Primary error enum for configuration loading flows.

use thiserror::Error;

use crate::{
    codec::CodecError, defaults::DefaultsError, merge::DecodeError, schema::SchemaError,
    source::SourceError,
};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StratumError {
    /// The configuration type could not be described as a schema.
    #[error("failed to generate schema: {0}")]
    Schema(#[from] SchemaError),

    /// Sources could not be collected or read.
    #[error("failed to collect configuration sources: {0}")]
    Source(#[from] SourceError),

    /// A source was read but its content could not be merged.
    #[error("failed to decode {source_name}: {source}")]
    Decode {
        /// Human-readable identity of the offending source.
        source_name: String,
        /// Underlying decoding failure.
        #[source]
        source: DecodeError,
    },

    /// A schema default did not fit the value it was meant to fill.
    #[error("failed to apply defaults: {0}")]
    Defaults(#[from] DefaultsError),

    /// Dumping the schema or the loaded values failed.
    #[error("failed to dump configuration as '{format}': {source}")]
    Dump {
        /// Format requested by the dump directive.
        format: String,
        /// Codec failure raised while encoding.
        #[source]
        source: CodecError,
    },

    /// The load was cancelled before it completed.
    #[error("configuration loading was cancelled")]
    Cancelled,
}
