//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! This macro generates an implementation of the `Filterable` trait and
//! field name constants for building queries without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_fiql_attrs;

/// Main implementation of the Filterable derive macro.
pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let mut inserts: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<(String, String)> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let fiql_attrs = parse_fiql_attrs(&field.attrs)?;

        if fiql_attrs.skip {
            continue;
        }

        let query_name = fiql_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());

        let const_str = to_screaming_snake_case(&query_name);
        if !const_str.chars().any(|c| c.is_alphanumeric()) {
            return Err(Error::new(
                field.span(),
                format!(
                    "query field name '{}' has no letters or digits to build a constant from",
                    query_name
                ),
            ));
        }

        for (other_query, other_const) in &seen {
            if *other_query == query_name {
                return Err(Error::new(
                    field.span(),
                    format!("duplicate query field name '{}'", query_name),
                ));
            }
            if *other_const == const_str {
                return Err(Error::new(
                    field.span(),
                    format!(
                        "query field names '{}' and '{}' both produce the constant {}",
                        other_query, query_name, const_str
                    ),
                ));
            }
        }
        seen.push((query_name.clone(), const_str.clone()));

        let const_name = format_ident!("{}", const_str);

        field_constants.push(quote! {
            /// Field name constant for queries.
            pub const #const_name: &'static str = #query_name;
        });

        inserts.push(quote! {
            fields.insert(
                ::std::string::String::from(#query_name),
                ::fiql::ToValue::to_value(&self.#field_name),
            );
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::fiql::Filterable for #struct_name #ty_generics #where_clause {
            fn to_field_map(&self) -> ::fiql::FieldMap {
                let mut fields = ::fiql::FieldMap::new();
                #(#inserts)*
                fields
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = !c.is_ascii_digit() || prev_was_lower;
        } else {
            if !result.ends_with('_') {
                result.push('_');
            }
            prev_was_lower = false;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}
