//! Folding ordered sources into one typed value.
//!
//! Each source yields an untyped fragment. The fragment is overlaid onto the
//! serialized accumulator with [`merge_value`] so that later sources win at
//! the field level while members they omit keep their earlier values.

pub(crate) mod conform;
mod infer;


use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

pub use infer::infer_scalars;

use crate::{
    CancellationToken, StratumResult, StratumResultExt,
    codec::{CodecError, Codecs},
    descriptor::Configurable,
    source::Source,
};

/// Errors raised while decoding a fragment into the accumulator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// No codec is registered for the source's format.
    #[error("no codec registered for format '{format}'")]
    UnknownFormat {
        /// Format tag of the source.
        format: String,
    },
    /// The codec rejected the source's bytes.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The accumulator could not be serialized.
    #[error("failed to encode the accumulated value: {0}")]
    Encode(#[source] serde_yaml::Error),
    /// The merged document does not fit the configuration type.
    #[error("merged document does not fit the configuration type: {0}")]
    Typed(#[source] serde_yaml::Error),
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging a mapping into a non-mapping target, target is initialized
///   to an empty mapping first.
/// - Mappings are merged recursively (keys are added or overwritten, and
///   nested mappings are overlaid).
/// - Sequences and scalars replace `target` wholesale.
///
/// # Examples
///
/// ```rust
/// use stratum_config::merge_value;
///
/// let mut acc: serde_yaml::Value = serde_yaml::from_str("{a: 1, b: {x: 1}}")?;
/// merge_value(&mut acc, serde_yaml::from_str("{b: {y: 2}, c: 3}")?);
/// assert_eq!(acc, serde_yaml::from_str::<serde_yaml::Value>("{a: 1, b: {x: 1, y: 2}, c: 3}")?);
///
/// // Sequences replace existing values.
/// merge_value(&mut acc, serde_yaml::from_str("{b: [1, 2, 3]}")?);
/// assert_eq!(acc["b"], serde_yaml::from_str::<serde_yaml::Value>("[1, 2, 3]")?);
/// # Ok::<_, serde_yaml::Error>(())
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Mapping(map) => merge_mapping(target, map),
        other => *target = other,
    }
}

fn merge_mapping(target: &mut Value, map: Mapping) {
    if !target.is_mapping() {
        *target = Value::Mapping(Mapping::new());
    }

    let Some(target_map) = target.as_mapping_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

/// Decode `fragment` into `target`.
///
/// Members present in the fragment overwrite the target's values; members it
/// omits are left untouched. A `null` fragment leaves the target unchanged.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the merged document does not fit `T`.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stratum_config::{Configurable, decode_into};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Configurable)]
/// struct Limits {
///     soft: u32,
///     hard: u32,
/// }
///
/// let mut limits = Limits { soft: 1, hard: 2 };
/// decode_into(&mut limits, serde_yaml::from_str("hard: '10'")?)?;
/// assert_eq!((limits.soft, limits.hard), (1, 10));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn decode_into<T: Configurable>(target: &mut T, fragment: Value) -> Result<(), DecodeError> {
    decode_layer(target, fragment).map(drop)
}

/// Decode `fragment` into `target` and return the fragment as coerced to
/// `T`, which records what the source supplied.
pub(crate) fn decode_layer<T: Configurable>(
    target: &mut T,
    mut fragment: Value,
) -> Result<Value, DecodeError> {
    if fragment.is_null() {
        return Ok(fragment);
    }
    let descriptor = T::descriptor();
    let mut merged = serde_yaml::to_value(&*target).map_err(DecodeError::Encode)?;
    conform::coerce(&mut fragment, &descriptor);
    merge_value(&mut merged, fragment.clone());
    conform::complete(&mut merged, &descriptor);
    *target = serde_yaml::from_value(merged).map_err(DecodeError::Typed)?;
    Ok(fragment)
}

/// Folds ordered sources into a typed accumulator.
#[derive(Debug)]
pub struct DocumentMerger<'a> {
    codecs: &'a Codecs,
    cancel: &'a CancellationToken,
}

impl<'a> DocumentMerger<'a> {
    /// Create a merger decoding input sources with `codecs`.
    #[must_use]
    pub const fn new(codecs: &'a Codecs, cancel: &'a CancellationToken) -> Self {
        Self { codecs, cancel }
    }

    /// Merge `sources` in order into a fresh `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::StratumError`] naming the offending source when a
    /// source cannot be read or decoded, or
    /// [`crate::StratumError::Cancelled`] when cancellation is observed.
    pub fn merge<T: Configurable>(&self, sources: &[Source]) -> StratumResult<T> {
        let mut value = T::default();
        self.fold(sources, |source, fragment| {
            decode_into(&mut value, fragment).decoded_from(source)
        })?;
        Ok(value)
    }

    /// Fetch each source's fragment in order and hand it to `apply`.
    ///
    /// Cancellation is checked before every fetch.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a fetch or by `apply`.
    pub fn fold<F>(&self, sources: &[Source], mut apply: F) -> StratumResult<()>
    where
        F: FnMut(&Source, Value) -> StratumResult<()>,
    {
        for source in sources {
            self.cancel.check()?;
            let fragment = source.values(self.codecs)?;
            debug!(%source, "merging configuration source");
            apply(source, fragment)?;
        }
        Ok(())
    }
}
