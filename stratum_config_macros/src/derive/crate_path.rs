//! Crate path resolution for renamed dependencies.
//!
//! Turns the optional `#[stratum_config(crate = "...")]` value into the path
//! prefix used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path, defaulting to `stratum_config`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::stratum_config }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for crate path resolution.

    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;

    #[rstest]
    #[case::default(None, ":: stratum_config")]
    #[case::local(Some("crate"), "crate")]
    #[case::alias(Some("my_config"), "my_config")]
    #[case::nested(Some("deps::stratum_config"), "deps :: stratum_config")]
    fn resolve_produces_expected_tokens(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let parsed = input.map(syn::parse_str::<syn::Path>).transpose()?;
        let tokens = resolve(parsed.as_ref()).to_string();
        ensure!(tokens == expected, "expected `{expected}`, got `{tokens}`");
        Ok(())
    }
}
