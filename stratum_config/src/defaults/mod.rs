//! Structural defaults applied after sources are merged.
//!
//! [`apply_defaults`] walks a loaded value alongside its schema. A member
//! whose value equals its zero value takes the schema's `default` when one is
//! declared; otherwise the walk descends into records, sequences, fixed
//! arrays, optionals, and maps so that nested defaults still apply. Values a
//! source already supplied are never overwritten.
//!
//! Collections are judged against the merged source document when one is
//! available ([`apply_supplied_defaults`]): an empty list or map a source
//! spelled out is kept, and only a collection no source mentioned takes its
//! default.

mod supplied;
#[cfg(test)]
mod tests;

use thiserror::Error;

pub use supplied::Supplied;

use crate::{descriptor::Configurable, schema::Schema};

/// Errors raised while applying schema defaults.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DefaultsError {
    /// A record member has no matching schema property.
    #[error("schema has no property `{name}`")]
    MissingProperty {
        /// Serialized member name.
        name: String,
    },
    /// A sequence schema has no `items` node.
    #[error("sequence schema has no `items`")]
    MissingItems,
    /// A map schema has no value schema.
    #[error("map schema has no `additionalProperties` schema")]
    MissingValues,
    /// The declared default does not fit the member's type.
    #[error("default does not fit the member: {0}")]
    Decode(#[source] serde_yaml::Error),
    /// An error raised for a nested member.
    #[error("{path}: {source}")]
    Within {
        /// Dotted path of the member, outermost first.
        path: String,
        /// Error raised for the member.
        #[source]
        source: Box<DefaultsError>,
    },
}

impl DefaultsError {
    /// Attribute the error to the member `segment`.
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        match self {
            Self::Within { path, source } => Self::Within {
                path: format!("{segment}.{path}"),
                source,
            },
            other => Self::Within {
                path: segment.to_owned(),
                source: Box::new(other),
            },
        }
    }
}

/// Fill unset members of `value` from the defaults declared in `schema`.
///
/// The operation is idempotent.
///
/// # Errors
///
/// Returns a [`DefaultsError`] when a default does not fit its member or the
/// schema does not match the value's shape.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stratum_config::{Configurable, apply_defaults, schema::generate};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Configurable)]
/// struct Retry {
///     #[stratum_config(default = "3")]
///     attempts: u32,
///     #[stratum_config(default = "5s")]
///     backoff: stratum_config::Duration,
/// }
///
/// let schema = generate::<Retry>()?;
/// let mut retry = Retry { attempts: 7, ..Retry::default() };
/// apply_defaults(&mut retry, &schema)?;
/// assert_eq!(retry.attempts, 7);
/// assert_eq!(retry.backoff.to_string(), "5s");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn apply_defaults<T: Configurable>(value: &mut T, schema: &Schema) -> Result<(), DefaultsError> {
    apply_supplied_defaults(value, schema, Supplied::Unknown)
}

/// Fill unset members of `value`, consulting the document the sources
/// `supplied` for it.
///
/// Behaves like [`apply_defaults`], except that a collection a source
/// supplied is set even when empty.
///
/// # Errors
///
/// See [`apply_defaults`].
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stratum_config::{Configurable, defaults::{Supplied, apply_supplied_defaults}};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Configurable)]
/// struct Listen {
///     #[stratum_config(default = "[80, 443]")]
///     ports: Vec<u16>,
/// }
///
/// let schema = stratum_config::schema::generate::<Listen>()?;
/// let document: serde_yaml::Value = serde_yaml::from_str("ports: []")?;
/// let mut listen = Listen::default();
/// apply_supplied_defaults(&mut listen, &schema, Supplied::tree(&document))?;
/// assert!(listen.ports.is_empty());
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn apply_supplied_defaults<T: Configurable>(
    value: &mut T,
    schema: &Schema,
    supplied: Supplied<'_>,
) -> Result<(), DefaultsError> {
    if value.is_unset_in(supplied)
        && let Some(default) = &schema.default
    {
        *value = serde_yaml::from_value(default.clone()).map_err(DefaultsError::Decode)?;
        return Ok(());
    }
    value.fill_defaults(schema, supplied)
}

/// Apply defaults to the record member `name` using the record's `schema`
/// and the document the sources supplied for the record.
///
/// Called by code generated from `#[derive(Configurable)]`.
///
/// # Errors
///
/// Returns a [`DefaultsError`] when `schema` has no property `name` or
/// applying the member's defaults fails.
pub fn apply_field_defaults<T: Configurable>(
    field: &mut T,
    schema: &Schema,
    name: &str,
    supplied: Supplied<'_>,
) -> Result<(), DefaultsError> {
    let property = schema
        .property(name)
        .ok_or_else(|| DefaultsError::MissingProperty {
            name: name.to_owned(),
        })?;
    apply_supplied_defaults(field, property, supplied.member(name)).map_err(|err| err.within(name))
}
