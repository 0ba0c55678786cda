//! Extensions for attributing decode failures to the source that caused them.
//!
//! These helpers reduce repetitive
//! `.map_err(|e| StratumError::decode(&source, e.into()))` patterns when a
//! codec or typed-decode error has to name the source it came from.
//!
//! ```
//! use stratum_config::{DecodeError, StratumResult, StratumResultExt};
//!
//! fn parse(text: &str) -> StratumResult<serde_yaml::Value> {
//!     serde_yaml::from_str(text)
//!         .map_err(DecodeError::Typed)
//!         .decoded_from("inline text")
//! }
//!
//! assert!(parse("key: value").is_ok());
//! ```

use std::fmt::Display;

use crate::{StratumError, StratumResult, merge::DecodeError};

/// Map `Result<T, E>` with `E: Into<DecodeError>` into a [`StratumResult`].
pub trait StratumResultExt<T> {
    /// Attribute a decode failure to `source`.
    ///
    /// # Errors
    ///
    /// Propagates the original error as [`StratumError::Decode`].
    fn decoded_from(self, source: impl Display) -> StratumResult<T>;
}

impl<T, E> StratumResultExt<T> for Result<T, E>
where
    E: Into<DecodeError>,
{
    fn decoded_from(self, source: impl Display) -> StratumResult<T> {
        self.map_err(|err| StratumError::decode(source, err.into()))
    }
}
