//! Derive macros used by the `trellis` crate.
//!
//! `#[derive(WithBuilders)]` turns every named field of a struct into a
//! consuming `with_<field>` method, so configuration types read as chains:
//!
//! ```ignore
//! use trellis_macros::WithBuilders;
//!
//! #[derive(Default, WithBuilders)]
//! pub struct SceneConfig {
//!     /// Logical size of the window
//!     #[with_builders(into)]
//!     pub viewport: Vec2,
//!     #[with_builders(skip)]
//!     pub frame_counter: u64,
//! }
//!
//! let config = SceneConfig::default().with_viewport([800.0, 600.0]);
//! ```
//!
//! Field attributes:
//! - `skip` leaves the field without a builder.
//! - `into` makes the builder accept `impl Into<FieldType>`.
//!
//! A field's own doc comments are copied onto its builder.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Field, Fields};

#[proc_macro_derive(WithBuilders, attributes(with_builders))]
pub fn derive_with_builders(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "WithBuilders needs named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "WithBuilders can only be derived for structs",
            ))
        }
    };

    let mut builders = Vec::new();
    for field in fields {
        if let Some(builder) = Builder::from_field(field)? {
            builders.push(builder.into_method());
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#builders)*
        }
    })
}

/// One generated `with_<field>` method
struct Builder<'a> {
    field: &'a Field,
    docs: Vec<&'a Attribute>,
    into: bool,
}

impl<'a> Builder<'a> {
    /// `None` for skipped fields
    fn from_field(field: &'a Field) -> syn::Result<Option<Self>> {
        let mut skip = false;
        let mut into = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("with_builders")) {
            attr.parse_nested_meta(|meta| {
                match meta.path.get_ident().map(ToString::to_string).as_deref() {
                    Some("skip") => skip = true,
                    Some("into") => into = true,
                    _ => return Err(meta.error("unknown with_builders option, expected `skip` or `into`")),
                }
                Ok(())
            })?;
        }
        if skip {
            return Ok(None);
        }

        let docs = field.attrs.iter().filter(|a| a.path().is_ident("doc")).collect();
        Ok(Some(Self { field, docs, into }))
    }

    fn into_method(self) -> TokenStream2 {
        let Some(ident) = &self.field.ident else {
            return TokenStream2::new();
        };
        let ty = &self.field.ty;
        let method = format_ident!("with_{}", ident);
        let docs = if self.docs.is_empty() {
            let fallback = format!("Set `{ident}`.");
            quote!(#[doc = #fallback])
        } else {
            let docs = &self.docs;
            quote!(#(#docs)*)
        };

        let (param, value) = if self.into {
            (quote!(impl ::core::convert::Into<#ty>), quote!(value.into()))
        } else {
            (quote!(#ty), quote!(value))
        };

        quote! {
            #docs
            #[must_use]
            pub fn #method(mut self, value: #param) -> Self {
                self.#ident = #value;
                self
            }
        }
    }
}
