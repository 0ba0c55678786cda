//! Typed, layered configuration loading for `stratum_config`.
//!
//! An application describes its configuration as a plain Rust type deriving
//! [`Configurable`] alongside serde's `Serialize`, `Deserialize`, and
//! `Default`. From that single declaration the crate:
//!
//! - generates a JSON-Schema-like [`Schema`] whose nodes carry constraints
//!   declared through field annotations ([`schema::generate`]);
//! - collects ordered [`Source`]s from environment variables, command-line
//!   flags, files, and standard input ([`DefaultSourceProvider`]);
//! - merges every source into one typed value, later sources overriding
//!   earlier ones ([`DocumentMerger`]);
//! - fills every field the sources left unset from schema defaults
//!   ([`apply_defaults`]).
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use stratum_config::{Configurable, load_from_process};
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Configurable)]
//! struct Settings {
//!     #[stratum_config(default = "8080", min = "1")]
//!     port: u16,
//!     #[stratum_config(doc = "Greeting shown on start-up", default = "hello")]
//!     greeting: String,
//! }
//!
//! let settings: Settings = load_from_process("demo")?;
//! # Ok::<_, stratum_config::StratumError>(())
//! ```

pub use stratum_config_macros::Configurable;

mod cancel;
pub mod codec;
pub mod defaults;
pub mod descriptor;
mod error;
mod result_ext;
mod loader;
pub mod merge;
pub mod schema;
pub mod source;

pub use cancel::CancellationToken;
pub use codec::{Codec, CodecError, Codecs};
pub use defaults::{DefaultsError, apply_defaults};
pub use descriptor::{
    Annotations, Configurable, Duration, FieldDescriptor, Regex, Shape, TypeDescriptor,
};
pub use error::{StratumError, StratumResult};
pub use loader::{Directives, Host, Loader, ProcessHost, RESERVED_KEY, load_from_process};
pub use merge::{DecodeError, DocumentMerger, decode_into, merge_value};
pub use result_ext::StratumResultExt;
pub use schema::{Schema, SchemaError};
pub use source::{
    DefaultSourceProvider, Input, InputSource, Origin, PropertyEntry, PropertySource,
    SharedReader, Source, SourceError, SourceProvider,
};

