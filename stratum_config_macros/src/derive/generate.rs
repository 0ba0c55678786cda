//! Emits the `Configurable` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, GenericParam, parse_quote};

use super::parse::{ParsedField, ParsedInput};

/// Build `impl Configurable for ...` from the parsed input.
pub(crate) fn configurable_impl(
    input: &DeriveInput,
    parsed: &ParsedInput<'_>,
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(parse_quote!(#krate::Configurable));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let described: Vec<&ParsedField<'_>> = parsed
        .fields
        .iter()
        .filter(|field| !field.attrs.skip)
        .collect();
    let descriptors = described.iter().map(|field| field_descriptor(field, krate));
    let members = described.iter().map(|field| field.ident);
    let unset_in = described.iter().map(|field| unset_in_field(field, krate));
    let fill = described.iter().map(|field| fill_field(field, krate));
    let unused = described
        .is_empty()
        .then(|| quote! { let _ = (schema, supplied); });
    let unused_supplied = described.is_empty().then(|| quote! { let _ = supplied; });

    quote! {
        impl #impl_generics #krate::Configurable for #ident #ty_generics #where_clause {
            fn descriptor() -> #krate::TypeDescriptor {
                #krate::TypeDescriptor::record::<Self>(::std::vec![#(#descriptors),*])
            }

            fn is_unset(&self) -> bool {
                true #(&& #krate::Configurable::is_unset(&self.#members))*
            }

            fn is_unset_in(&self, supplied: #krate::defaults::Supplied<'_>) -> bool {
                #unused_supplied
                true #(&& #unset_in)*
            }

            fn fill_defaults(
                &mut self,
                schema: &#krate::schema::Schema,
                supplied: #krate::defaults::Supplied<'_>,
            ) -> ::core::result::Result<(), #krate::defaults::DefaultsError> {
                #unused
                #(#fill)*
                ::core::result::Result::Ok(())
            }
        }
    }
}

fn field_descriptor(field: &ParsedField<'_>, krate: &TokenStream) -> TokenStream {
    let ty = field.ty;
    let key = &field.attrs.key;
    let annotations = field
        .attrs
        .annotations
        .iter()
        .map(|(name, text)| quote! { .annotate(#name, #text) });
    let inline = field.attrs.inline.then(|| quote! { .inline() });
    let optional = field.attrs.optional.then(|| quote! { .optional() });
    quote! {
        #krate::FieldDescriptor::new::<#ty>(#key) #(#annotations)* #inline #optional
    }
}

fn unset_in_field(field: &ParsedField<'_>, krate: &TokenStream) -> TokenStream {
    let member = field.ident;
    if field.attrs.inline {
        return quote! { #krate::Configurable::is_unset_in(&self.#member, supplied) };
    }
    let key = &field.attrs.key;
    quote! { #krate::Configurable::is_unset_in(&self.#member, supplied.member(#key)) }
}

fn fill_field(field: &ParsedField<'_>, krate: &TokenStream) -> TokenStream {
    let member = field.ident;
    if field.attrs.inline {
        return quote! {
            #krate::Configurable::fill_defaults(&mut self.#member, schema, supplied)?;
        };
    }
    let key = &field.attrs.key;
    quote! {
        #krate::defaults::apply_field_defaults(&mut self.#member, schema, #key, supplied)?;
    }
}
