//! Attribute parsing for the `Configurable` derive.
//!
//! Field keys are computed the way serde spells them: an explicit
//! `#[serde(rename)]` wins, then the container's `rename_all` rule, then the
//! field identifier itself.

mod literals;
mod serde_attrs;


use syn::ext::IdentExt as _;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Token, Type, parenthesized};

use self::serde_attrs::SerdeRenameAll;

/// Container-level `#[stratum_config(...)]` settings.
#[derive(Default)]
pub(crate) struct StructAttrs {
    pub crate_path: Option<syn::Path>,
}

/// Field-level settings merged from serde and `#[stratum_config(...)]`.
pub(crate) struct FieldAttrs {
    pub key: String,
    pub inline: bool,
    pub skip: bool,
    pub optional: bool,
    pub annotations: Vec<(String, String)>,
}

pub(crate) struct ParsedField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttrs,
}

pub(crate) struct ParsedInput<'a> {
    pub attrs: StructAttrs,
    pub fields: Vec<ParsedField<'a>>,
}

/// Validate the shape of `input` and collect its attributes.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput<'_>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Configurable can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            data.struct_token,
            "Configurable requires named fields",
        ));
    };
    let rename_all = serde_attrs::serde_rename_all(&input.attrs)?;
    let fields = named
        .named
        .iter()
        .map(|field| parse_field(field, rename_all))
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(ParsedInput {
        attrs: parse_struct_attrs(&input.attrs)?,
        fields,
    })
}

/// Iterate every `#[stratum_config(...)]` attribute and apply `f` to each
/// nested item.
fn parse_stratum_config<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("stratum_config")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consume an unrecognised key-value pair or list without recording it.
fn discard_unknown(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Extract container settings. Only `crate` is recognised; other keys are
/// discarded.
fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_stratum_config(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let path = literals::lit_str(meta, "crate")?.parse::<syn::Path>()?;
            out.crate_path = Some(path);
            Ok(())
        } else {
            discard_unknown(meta)
        }
    })?;
    Ok(out)
}

fn parse_field(field: &Field, rename_all: Option<SerdeRenameAll>) -> syn::Result<ParsedField<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Configurable requires named fields"))?;
    let serde = serde_attrs::serde_field_attrs(&field.attrs)?;
    let declared = ident.unraw().to_string();
    let key = serde.rename.unwrap_or_else(|| {
        rename_all.map_or_else(|| declared.clone(), |rule| rule.apply(&declared))
    });

    let mut out = FieldAttrs {
        key,
        inline: serde.flatten,
        skip: serde.skip,
        optional: serde.optional,
        annotations: Vec::new(),
    };
    parse_stratum_config(&field.attrs, |meta| {
        let Some(name) = meta.path.get_ident().map(|part| part.unraw().to_string()) else {
            return Err(meta.error("expected an annotation key"));
        };
        match name.as_str() {
            "inline" => out.inline = true,
            "skip" => out.skip = true,
            "optional" => out.optional = true,
            _ => {
                let text = literals::lit_text(meta, &name)?;
                out.annotations.push((name, text));
            }
        }
        Ok(())
    })?;

    Ok(ParsedField {
        ident,
        ty: &field.ty,
        attrs: out,
    })
}
