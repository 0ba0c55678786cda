//! Literal parsing helpers for derive attributes.

use syn::{Lit, LitStr};

/// Parse the literal after `key =` using `extractor`, naming `expected` in
/// the error when it does not fit.
fn parse_lit<T, F>(
    meta: &syn::meta::ParseNestedMeta,
    key: &str,
    expected: &str,
    extractor: F,
) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be {expected}")))
}

/// Parse a string literal.
pub(crate) fn lit_str(meta: &syn::meta::ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "a string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parse a string, numeric, or boolean literal as annotation text.
///
/// Numbers keep their written digits without suffix, so `min = 1u8` and
/// `min = "1"` record the same text.
pub(crate) fn lit_text(meta: &syn::meta::ParseNestedMeta, key: &str) -> syn::Result<String> {
    parse_lit(meta, key, "a string, number, or boolean", |lit| match lit {
        Lit::Str(s) => Some(s.value()),
        Lit::Int(i) => Some(i.base10_digits().to_owned()),
        Lit::Float(f) => Some(f.base10_digits().to_owned()),
        Lit::Bool(b) => Some(b.value.to_string()),
        _ => None,
    })
}
