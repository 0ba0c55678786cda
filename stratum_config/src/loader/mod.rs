//! Loading a configuration type end to end.
//!
//! [`Loader`] collects sources, merges them into the target type, applies
//! schema defaults, and honours the dump directives found under the reserved
//! [`RESERVED_KEY`] member.

mod host;


use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

pub use host::{Host, ProcessHost};

use crate::{
    CancellationToken, Configurable, StratumError, StratumResult, StratumResultExt,
    codec::{CodecError, Codecs},
    defaults::{Supplied, apply_supplied_defaults},
    merge::{DocumentMerger, decode_into, decode_layer, merge_value},
    schema::{Schema, SchemaError, generate},
    source::{DefaultSourceProvider, SourceProvider},
};

/// Member of every source reserved for loader directives.
pub const RESERVED_KEY: &str = "config";

/// Directives read from the reserved `config` member of any source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
pub struct Directives {
    /// Format in which to dump the loaded values before exiting.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[stratum_config(doc = "Dump configuration values in specified format to stdout.")]
    pub values: String,

    /// Format in which to dump the configuration schema before exiting.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[stratum_config(doc = "Dump configuration schema in specified format to stdout.")]
    pub schema: String,
}

/// Loads configuration types from the sources of a [`SourceProvider`].
///
/// ```rust,no_run
/// use serde::{Deserialize, Serialize};
/// use stratum_config::{CancellationToken, Configurable, DefaultSourceProvider, Loader};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Configurable)]
/// struct Settings {
///     #[stratum_config(default = "info")]
///     level: String,
/// }
///
/// let mut loader = Loader::new(DefaultSourceProvider::from_process("demo"));
/// let settings: Settings = loader.load(&CancellationToken::new())?;
/// # Ok::<_, stratum_config::StratumError>(())
/// ```
pub struct Loader<P> {
    provider: P,
    codecs: Codecs,
    host: Box<dyn Host>,
}

impl<P: SourceProvider> Loader<P> {
    /// A loader over `provider` with the default codecs and the process host.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            codecs: Codecs::default(),
            host: Box::new(ProcessHost),
        }
    }

    /// Replace the codec registry.
    #[must_use]
    pub fn codecs(mut self, codecs: Codecs) -> Self {
        self.codecs = codecs;
        self
    }

    /// Replace the host receiving dumps.
    #[must_use]
    pub fn host(mut self, host: impl Host + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Load a `T`.
    ///
    /// When a source sets `config.schema` or `config.values`, the schema or
    /// the loaded values are written to the host's stdout in that format and
    /// the host is asked to exit.
    ///
    /// # Errors
    ///
    /// Returns a [`StratumError`] when the schema cannot be generated, a
    /// source cannot be collected, read, or decoded, a default does not fit,
    /// a dump fails, or `cancel` is triggered.
    pub fn load<T: Configurable>(&mut self, cancel: &CancellationToken) -> StratumResult<T> {
        cancel.check()?;
        let sources = self.provider.sources()?;
        let schema = generate::<T>()?;
        let envelope = envelope_schema::<T>(&schema, &self.codecs)?;
        debug!(sources = sources.len(), "loading configuration");

        let mut directives = Directives::default();
        let mut values = T::default();
        let mut supplied = Value::Null;
        DocumentMerger::new(&self.codecs, cancel).fold(&sources, |source, fragment| {
            let (reserved, rest) = split_reserved(fragment);
            if let Some(tree) = reserved {
                decode_into(&mut directives, tree).decoded_from(source)?;
            }
            let layer = decode_layer(&mut values, rest).decoded_from(source)?;
            if !layer.is_null() {
                merge_value(&mut supplied, layer);
            }
            Ok(())
        })?;

        apply_supplied_defaults(&mut values, &schema, Supplied::tree(&supplied))?;
        self.dump(&directives.schema, &envelope)?;
        self.dump(&directives.values, &values)?;
        Ok(values)
    }

    fn dump<V: Serialize>(&mut self, format: &str, value: &V) -> StratumResult<()> {
        if format.is_empty() {
            return Ok(());
        }
        let codec = self.codecs.get(format).ok_or_else(|| {
            StratumError::dump(
                format,
                CodecError::UnknownFormat {
                    format: format.to_owned(),
                },
            )
        })?;
        let tree = serde_yaml::to_value(value)
            .map_err(|err| StratumError::dump(format, CodecError::encode("yaml", err)))?;
        debug!(format, "dumping configuration");
        {
            let mut out = self.host.stdout();
            codec
                .encode(&tree, &mut *out)
                .map_err(|err| StratumError::dump(format, err))?;
            out.flush()
                .map_err(|err| StratumError::dump(format, CodecError::Write(err)))?;
        }
        self.host.exit();
        Ok(())
    }
}

/// Load a `T` from the process environment, arguments, and stdin.
///
/// Environment variables are read under the prefix derived from `app_name`
/// (see [`DefaultSourceProvider::from_process`]).
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load_from_process<T: Configurable>(app_name: &str) -> StratumResult<T> {
    Loader::new(DefaultSourceProvider::from_process(app_name)).load(&CancellationToken::new())
}

fn envelope_schema<T>(values: &Schema, codecs: &Codecs) -> StratumResult<Schema> {
    if !values.is_record() {
        return Err(SchemaError::NotRecord {
            type_name: std::any::type_name::<T>(),
        }
        .into());
    }
    if values.properties.contains_key(RESERVED_KEY) {
        return Err(SchemaError::ReservedKey {
            key: RESERVED_KEY.to_owned(),
        }
        .into());
    }
    let mut directives = generate::<Directives>()?;
    let formats = Value::Sequence(codecs.formats().map(Value::from).collect());
    for directive in directives.properties.values_mut() {
        directive.enumeration = Some(formats.clone());
    }
    let mut envelope = values.clone();
    envelope
        .properties
        .insert(RESERVED_KEY.to_owned(), directives);
    Ok(envelope)
}

fn split_reserved(fragment: Value) -> (Option<Value>, Value) {
    match fragment {
        Value::Mapping(mut map) => {
            let reserved = map.remove(RESERVED_KEY);
            (reserved, Value::Mapping(map))
        }
        other => (None, other),
    }
}
