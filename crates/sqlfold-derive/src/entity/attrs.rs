//! Attribute parsing for the Entity derive macro.
//!
//! Struct level: `#[orm(table = "...", alias = "...")]`.
//! Field level: `#[orm(column = "...")]` and `#[orm(skip)]`.

use syn::{DeriveInput, Result};

use crate::sql_ident::{parse_sql_ident, parse_table_name};

#[derive(Default)]
pub(super) struct StructAttrs {
    pub(super) table: Option<String>,
    pub(super) alias: Option<String>,
}

impl syn::parse::Parse for StructAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = StructAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            match ident.to_string().as_str() {
                "table" => attrs.table = Some(parse_table_name(&value)?),
                "alias" => attrs.alias = Some(parse_sql_ident(&value, "alias")?),
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown entity attribute `{other}` (expected table or alias)"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

#[derive(Default)]
pub(super) struct FieldAttrs {
    pub(super) column: Option<String>,
    pub(super) skip: bool,
}

impl syn::parse::Parse for FieldAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = FieldAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attrs.skip = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attrs.column = Some(parse_sql_ident(&value, "column")?);
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown field attribute `{ident}` (expected column or skip)"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

/// Merge every struct-level `#[orm(...)]` attribute.
pub(super) fn get_struct_attrs(input: &DeriveInput) -> Result<StructAttrs> {
    let mut merged = StructAttrs::default();
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            let parsed: StructAttrs = attr.parse_args()?;
            if parsed.table.is_some() {
                merged.table = parsed.table;
            }
            if parsed.alias.is_some() {
                merged.alias = parsed.alias;
            }
        }
    }
    Ok(merged)
}

/// Merge every `#[orm(...)]` attribute on a field.
pub(super) fn get_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut merged = FieldAttrs::default();
    for attr in &field.attrs {
        if attr.path().is_ident("orm") {
            let parsed: FieldAttrs = attr.parse_args()?;
            merged.skip |= parsed.skip;
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
        }
    }
    if merged.skip && merged.column.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "#[orm(skip)] cannot be combined with #[orm(column = ...)]",
        ));
    }
    Ok(merged)
}
