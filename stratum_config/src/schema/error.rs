//! Errors raised while generating schemas.

use thiserror::Error;

/// Failure to decode annotation text into a schema keyword value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LiteralError {
    /// The text is not valid YAML for the expected value type.
    #[error("invalid literal: {0}")]
    Syntax(#[source] serde_yaml::Error),
    /// The text parsed but does not fit the constrained type.
    #[error("literal does not fit the type: {0}")]
    Decode(#[source] serde_yaml::Error),
    /// The decoded value could not be re-encoded.
    #[error("literal could not be re-encoded: {0}")]
    Encode(#[source] serde_yaml::Error),
    /// A list annotation did not parse as a list.
    #[error("list literal did not parse as a sequence")]
    NotSequence,
}

/// Errors raised while generating a schema from a type descriptor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The type's shape has no schema representation.
    #[error("unable to classify the shape of `{type_name}`")]
    Unclassified {
        /// Rust type name of the offending type.
        type_name: &'static str,
    },

    /// A field marked inline does not describe a record.
    #[error("inline field of type `{type_name}` is not a record")]
    InlineShape {
        /// Rust type name of the inline field.
        type_name: &'static str,
    },

    /// The configuration type is not a record.
    #[error("configuration type `{type_name}` must be a record")]
    NotRecord {
        /// Rust type name of the configuration type.
        type_name: &'static str,
    },

    /// An annotation's text could not be decoded.
    #[error("invalid `{keyword}` annotation `{alias}` = {text:?}: {source}")]
    Literal {
        /// Schema keyword being set.
        keyword: &'static str,
        /// Annotation key that supplied the text.
        alias: String,
        /// Raw annotation text.
        text: String,
        /// Decoding failure.
        #[source]
        source: LiteralError,
    },

    /// The configuration type declares a member reserved for loader directives.
    #[error("member `{key}` is reserved for loader directives")]
    ReservedKey {
        /// Reserved member name.
        key: String,
    },

    /// An error raised while describing a nested member.
    #[error("{path}: {source}")]
    Field {
        /// Dotted path of the member, outermost first.
        path: String,
        /// Error raised for the member.
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Attribute the error to the member `segment`.
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        match self {
            Self::Field { path, source } => Self::Field {
                path: format!("{segment}.{path}"),
                source,
            },
            other => Self::Field {
                path: segment.to_owned(),
                source: Box::new(other),
            },
        }
    }
}
