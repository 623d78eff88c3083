//! Entity derive macro implementation
//!
//! ## Module Structure
//!
//! - `attrs`: struct and field attribute parsing

mod attrs;

use attrs::{get_field_attrs, get_struct_attrs};

use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Some(&fields.named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let struct_attrs = get_struct_attrs(&input)?;
    let type_name = name.unraw().to_string();
    let table = struct_attrs.table.unwrap_or_else(|| type_name.clone());
    let alias = struct_attrs.alias.unwrap_or_else(|| type_name.clone());

    let mut columns = Vec::new();
    let mut field_idents = Vec::new();
    let mut col_consts = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.into_iter().flatten() {
        let attrs = get_field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let column = attrs.column.unwrap_or_else(|| field_name.clone());

        if !seen.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column '{column}'"),
            ));
        }

        let const_name = format_ident!("COL_{}", field_name.to_shouty_snake_case());
        col_consts.push(quote! {
            pub const #const_name: &'static str = #column;
        });
        columns.push(column);
        field_idents.push(ident.clone());
    }

    Ok(quote! {
        impl #impl_generics ::sqlfold::Entity for #name #ty_generics #where_clause {
            const NAME: &'static str = #type_name;
            const TABLE: &'static str = #table;
            const ALIAS: &'static str = #alias;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
        }

        impl #impl_generics ::sqlfold::Record for #name #ty_generics #where_clause {
            fn values(&self) -> ::std::vec::Vec<::sqlfold::Value> {
                ::std::vec![
                    #(::sqlfold::Value::from(::core::clone::Clone::clone(&self.#field_idents))),*
                ]
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #(#col_consts)*

            /// Typed reference to one of this entity's columns.
            pub fn field(column: &str) -> ::sqlfold::FieldRef {
                ::sqlfold::FieldRef::of::<Self>(column)
            }
        }
    })
}
