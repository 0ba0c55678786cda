//! Encoding and decoding configuration documents.
//!
//! Every codec converts between bytes and the untyped [`Value`] tree used by
//! the merger. [`Codecs`] maps format tags to codecs; the default registry
//! carries JSON, YAML, Java-style properties, and, behind their features,
//! TOML and JSON5.

mod formats;
mod properties;

#[cfg(test)]
mod tests;

use std::{
    collections::BTreeMap,
    fmt,
    io::{Read, Write},
    sync::Arc,
};

use camino::Utf8Path;
use serde_yaml::Value;
use thiserror::Error;

#[cfg(feature = "json5")]
pub use formats::Json5Codec;
#[cfg(feature = "toml")]
pub use formats::TomlCodec;
pub use formats::{JsonCodec, YamlCodec};
pub use properties::PropertiesCodec;

/// Boxed error type reported by format libraries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by codecs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// No codec is registered for the format.
    #[error("no codec registered for format '{format}'")]
    UnknownFormat {
        /// Requested format tag.
        format: String,
    },
    /// The input could not be read.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
    /// The output could not be written.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
    /// The input is not a valid document.
    #[error("invalid {format} document: {source}")]
    Decode {
        /// Format tag of the codec.
        format: &'static str,
        /// Parser failure.
        #[source]
        source: BoxError,
    },
    /// The value cannot be represented in the format.
    #[error("cannot encode value as {format}: {source}")]
    Encode {
        /// Format tag of the codec.
        format: &'static str,
        /// Serializer failure.
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub(crate) fn decode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            format,
            source: source.into(),
        }
    }

    pub(crate) fn encode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Encode {
            format,
            source: source.into(),
        }
    }
}

/// Converts between bytes and untyped trees.
pub trait Codec: Send + Sync {
    /// Write `value` to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the value cannot be represented or the
    /// output cannot be written.
    fn encode(&self, value: &Value, out: &mut dyn Write) -> Result<(), CodecError>;

    /// Read a document from `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the input cannot be read or parsed.
    fn decode(&self, input: &mut dyn Read) -> Result<Value, CodecError>;
}

/// Registry of codecs keyed by format tag.
///
/// ```
/// use stratum_config::Codecs;
///
/// let codecs = Codecs::default();
/// let codec = codecs.get("yaml").expect("yaml is built in");
/// let value = codec.decode(&mut "port: 80".as_bytes())?;
/// assert_eq!(value["port"], serde_yaml::Value::from(80));
/// # Ok::<_, stratum_config::CodecError>(())
/// ```
#[derive(Clone)]
pub struct Codecs {
    entries: BTreeMap<String, Arc<dyn Codec>>,
}

impl Codecs {
    /// A registry without any codec.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `codec` under `format`, replacing any previous entry.
    pub fn register(&mut self, format: impl Into<String>, codec: impl Codec + 'static) -> &mut Self {
        self.entries.insert(format.into(), Arc::new(codec));
        self
    }

    /// Codec registered under `format`.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<&dyn Codec> {
        self.entries.get(format).map(|codec| &**codec)
    }

    /// Registered format tags in sorted order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Codecs {
    fn default() -> Self {
        let mut codecs = Self::empty();
        codecs
            .register("json", JsonCodec)
            .register("yaml", YamlCodec)
            .register("properties", PropertiesCodec);
        #[cfg(feature = "toml")]
        codecs.register("toml", TomlCodec);
        #[cfg(feature = "json5")]
        codecs.register("json5", Json5Codec);
        codecs
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formats()).finish()
    }
}

/// Format tag implied by the extension of `path`.
///
/// ```
/// use camino::Utf8Path;
/// use stratum_config::codec::format_for_path;
///
/// assert_eq!(format_for_path(Utf8Path::new("app.YML")), Some("yaml"));
/// assert_eq!(format_for_path(Utf8Path::new("app.conf")), None);
/// ```
#[must_use]
pub fn format_for_path(path: &Utf8Path) -> Option<&'static str> {
    let extension = path.extension()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "yaml" | "yml" => "yaml",
        "json" => "json",
        "toml" => "toml",
        "json5" => "json5",
        "properties" => "properties",
        _ => return None,
    })
}

pub(crate) fn read_all(input: &mut dyn Read) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer).map_err(CodecError::Read)?;
    Ok(buffer)
}

pub(crate) fn read_text(input: &mut dyn Read, format: &'static str) -> Result<String, CodecError> {
    String::from_utf8(read_all(input)?).map_err(|err| CodecError::decode(format, err))
}
