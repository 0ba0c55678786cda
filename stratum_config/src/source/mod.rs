//! Configuration sources and their ordering.
//!
//! A [`Source`] is either a group of property path entries (from environment
//! variables or command-line flags) or a reference to encoded input (a file
//! or standard input) tagged with its format. [`DefaultSourceProvider`]
//! discovers both kinds from the process and orders them by precedence.

mod error;
mod input;
mod provider;
pub mod tree;


use std::fmt;

use serde_yaml::Value;

pub use error::SourceError;
pub use input::{Input, InputSource, SharedReader};
pub use provider::{DefaultSourceProvider, SourceProvider};

use crate::{StratumResult, codec::Codecs, merge::infer_scalars};

/// One property: a path of key segments and its textual value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Key segments, outermost first.
    pub path: Vec<String>,
    /// Raw value.
    pub value: String,
}

impl PropertyEntry {
    /// Build an entry from anything yielding path segments.
    #[must_use]
    pub fn new<I, S>(path: I, value: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            value: value.into(),
        }
    }
}

/// Where a property group was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Prefixed environment variables.
    Environment,
    /// `--key.path=value` flags.
    CommandLine,
}

/// An ordered group of property entries from one origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySource {
    /// Origin of the entries.
    pub origin: Origin,
    /// Entries in discovery order.
    pub entries: Vec<PropertyEntry>,
}

impl PropertySource {
    /// Group `entries` discovered at `origin`.
    #[must_use]
    pub const fn new(origin: Origin, entries: Vec<PropertyEntry>) -> Self {
        Self { origin, entries }
    }

    /// The nested tree spelled by the entries, leaves still textual.
    #[must_use]
    pub fn tree(&self) -> Value {
        tree::build(&self.entries)
    }
}

/// One configuration source.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Property path entries.
    Properties(PropertySource),
    /// Encoded input.
    Input(InputSource),
}

impl Source {
    /// Fetch the source's untyped tree.
    ///
    /// Property leaves go through scalar inference; input sources are read
    /// and decoded by the codec registered for their format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StratumError::Source`] when input cannot be read and
    /// [`crate::StratumError::Decode`] when it cannot be decoded.
    pub fn values(&self, codecs: &Codecs) -> StratumResult<Value> {
        match self {
            Self::Properties(properties) => Ok(infer_scalars(properties.tree())),
            Self::Input(input) => input.values(codecs),
        }
    }
}

impl From<PropertySource> for Source {
    fn from(properties: PropertySource) -> Self {
        Self::Properties(properties)
    }
}

impl From<InputSource> for Source {
    fn from(input: InputSource) -> Self {
        Self::Input(input)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Properties(PropertySource {
                origin: Origin::Environment,
                ..
            }) => f.write_str("environment properties"),
            Self::Properties(PropertySource {
                origin: Origin::CommandLine,
                ..
            }) => f.write_str("command-line properties"),
            Self::Input(input) => fmt::Display::fmt(input, f),
        }
    }
}
