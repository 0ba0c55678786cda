//! Regular expressions read from configuration text.

use std::{fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use thiserror::Error;

use super::{Configurable, Shape, StringHints, TypeDescriptor};

/// A compiled regular expression that round-trips as its pattern text.
///
/// The empty pattern is the zero value and leaves the expression unset, so
/// a declared default replaces it.
///
/// ```
/// use stratum_config::Regex;
/// let filter: Regex = r"^web-\d+$".parse()?;
/// assert!(filter.is_match("web-12"));
/// assert_eq!(filter.as_str(), r"^web-\d+$");
/// # Ok::<_, stratum_config::descriptor::ParseRegexError>(())
/// ```
#[derive(Clone, Default)]
pub struct Regex(Option<regex::Regex>);

impl Regex {
    /// The pattern text, empty when unset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref().map_or("", regex::Regex::as_str)
    }

    /// The compiled expression, if a pattern is set.
    #[must_use]
    pub const fn as_regex(&self) -> Option<&regex::Regex> {
        self.0.as_ref()
    }

    /// Whether `text` matches. An unset pattern matches everything.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.as_ref().is_none_or(|compiled| compiled.is_match(text))
    }
}

impl From<regex::Regex> for Regex {
    fn from(compiled: regex::Regex) -> Self {
        if compiled.as_str().is_empty() {
            Self(None)
        } else {
            Self(Some(compiled))
        }
    }
}

/// Failure to compile a [`Regex`] pattern.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("invalid regular expression {pattern:?}: {source}")]
pub struct ParseRegexError {
    /// Pattern that failed to compile.
    pub pattern: String,
    /// Compiler diagnostic.
    #[source]
    pub source: regex::Error,
}

impl FromStr for Regex {
    type Err = ParseRegexError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        if pattern.is_empty() {
            return Ok(Self(None));
        }
        regex::Regex::new(pattern)
            .map(|compiled| Self(Some(compiled)))
            .map_err(|source| ParseRegexError {
                pattern: pattern.to_owned(),
                source,
            })
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Regex {}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Regex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct RegexVisitor;

impl Visitor<'_> for RegexVisitor {
    type Value = Regex;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a regular expression")
    }

    fn visit_str<E: de::Error>(self, pattern: &str) -> Result<Regex, E> {
        pattern.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Regex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RegexVisitor)
    }
}

impl Configurable for Regex {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::String(StringHints::format("regex")))
    }

    fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}
