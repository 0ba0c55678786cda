//! Procedural macros for `stratum_config`.
//!
//! `#[derive(Configurable)]` describes a named-field struct to the schema
//! generator, the defaults applier, and the document merger. Field keys follow
//! the struct's serde attributes so the descriptor always names members the
//! way serialization spells them.
//!
//! Field attributes:
//!
//! - `#[stratum_config(inline)]` splices a nested record's members into the
//!   parent, as does `#[serde(flatten)]`;
//! - `#[stratum_config(skip)]` hides a field, as do the serde skip attributes;
//! - `#[stratum_config(optional)]` drops a field from `required`, as do
//!   `#[serde(default)]` and `#[serde(skip_serializing_if = "...")]`;
//! - any other `key = literal` pair is recorded as an annotation, for example
//!   `#[stratum_config(default = "8080", min = 1)]`.
//!
//! The container attribute `#[stratum_config(crate = "path")]` points the
//! generated code at a renamed dependency.

mod derive;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro for `stratum_config::Configurable`.
#[proc_macro_derive(Configurable, attributes(stratum_config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
