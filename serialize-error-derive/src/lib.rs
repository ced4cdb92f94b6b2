//! # serialize-error Derive Macros
//!
//! This crate provides the procedural macro for `serialize-error`. It implements the
//! `ToGraph` trait for structs with named fields, turning each field into a property of a
//! record allocated in the heap.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, parse_quote};

/// Derives `ToGraph`.
///
/// Container attributes:
/// * `#[graph(error)]`: the record gets the error prototype, so `name` defaults to `Error`.
///
/// Field attributes:
/// * `#[graph(skip)]`: leave the field out.
/// * `#[graph(hidden)]`: define the property as hidden.
/// * `#[graph(rename = "key")]`: use a different property name.
#[proc_macro_derive(ToGraph, attributes(graph))]
pub fn derive_to_graph(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let is_error = match parse_container_attributes(&input.attrs) {
        Ok(res) => res,
        Err(e) => return e.to_compile_error().into(),
    };

    let named = match input.data {
        Data::Struct(ds) => match ds.fields {
            Fields::Named(named) => named.named,
            _ => {
                return syn::Error::new(name.span(), "ToGraph needs a struct with named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(name.span(), "ToGraph only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let attrs = match parse_field_attributes(&field.attrs) {
            Ok(res) => res,
            Err(e) => return e.to_compile_error().into(),
        };
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident else {
            continue;
        };
        let key = attrs.rename.unwrap_or_else(|| ident.to_string());
        fields.push(GraphField {
            ident,
            key,
            hidden: attrs.hidden,
        });
    }

    let mut generics = input.generics;
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::serialize_error::ToGraph));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let prototype = generate_prototype(is_error);
    let defines = fields.iter().map(generate_define);

    let expanded = quote! {
        impl #impl_generics ::serialize_error::ToGraph for #name #ty_generics #where_clause {
            fn to_graph(
                &self,
                heap: &mut ::serialize_error::graph::Heap,
            ) -> ::serialize_error::Value {
                let mut record = ::serialize_error::graph::Record::new(#prototype);
                #(#defines)*
                ::serialize_error::Value::Object(heap.record(record))
            }
        }
    };

    TokenStream::from(expanded)
}

/// Prototype path for the generated record.
fn generate_prototype(is_error: bool) -> proc_macro2::TokenStream {
    if is_error {
        quote! { ::serialize_error::graph::Prototype::Error }
    } else {
        quote! { ::serialize_error::graph::Prototype::Object }
    }
}

/// Statements converting one field and defining it on `record`.
fn generate_define(field: &GraphField) -> proc_macro2::TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let visibility = if field.hidden {
        quote! { ::serialize_error::graph::Visibility::Hidden }
    } else {
        quote! { ::serialize_error::graph::Visibility::Visible }
    };
    quote! {
        let value = ::serialize_error::ToGraph::to_graph(&self.#ident, heap);
        record.define(#key, value, #visibility);
    }
}

struct GraphField {
    ident: syn::Ident,
    key: String,
    hidden: bool,
}

#[derive(Default)]
struct FieldAttributes {
    skip: bool,
    hidden: bool,
    rename: Option<String>,
}

/// Parses `#[graph(error)]` on the struct.
fn parse_container_attributes(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut is_error = false;
    for attr in attrs {
        if attr.path().is_ident("graph") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("error") {
                    is_error = true;
                    return Ok(());
                }
                Err(meta.error("Unknown graph container attribute. Supported: error"))
            })?;
        }
    }
    Ok(is_error)
}

/// Parses `#[graph(...)]` on a field.
fn parse_field_attributes(attrs: &[Attribute]) -> syn::Result<FieldAttributes> {
    let mut parsed = FieldAttributes::default();
    for attr in attrs {
        if attr.path().is_ident("graph") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    return Ok(());
                }

                if meta.path.is_ident("hidden") {
                    parsed.hidden = true;
                    return Ok(());
                }

                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    parsed.rename = Some(s.value());
                    return Ok(());
                }
                Err(meta.error("Unknown graph attribute key. Supported: skip, hidden, rename"))
            })?;
        }
    }
    Ok(parsed)
}
