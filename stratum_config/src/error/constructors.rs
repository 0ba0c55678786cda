//! Convenience constructors for [`StratumError`].

use std::fmt::Display;

use crate::{codec::CodecError, merge::DecodeError};

use super::StratumError;

impl StratumError {
    /// Construct a decode error attributed to `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_config::{DecodeError, StratumError};
    /// let err = StratumError::decode(
    ///     "environment properties",
    ///     DecodeError::UnknownFormat { format: "ini".into() },
    /// );
    /// assert!(matches!(err, StratumError::Decode { .. }));
    /// ```
    #[must_use]
    pub fn decode(source: impl Display, error: DecodeError) -> Self {
        Self::Decode {
            source_name: source.to_string(),
            source: error,
        }
    }

    /// Construct a dump error for `format`.
    #[must_use]
    pub fn dump(format: impl Into<String>, source: CodecError) -> Self {
        Self::Dump {
            format: format.into(),
            source,
        }
    }

    /// Returns `true` when the error reports cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
