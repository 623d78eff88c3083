//! Derive macros for sqlfold
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;
mod sql_ident;

/// Derive `Entity` and `Record` for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlfold::Entity;
///
/// #[derive(Entity)]
/// #[orm(table = "Users", alias = "u")]
/// struct User {
///     #[orm(column = "Id")]
///     id: i32,
///     #[orm(column = "UserName")]
///     name: String,
///     #[orm(skip)]
///     cached: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `Entity` impl: `NAME`, `TABLE`, `ALIAS`, `COLUMNS` (declaration order)
/// - `Record` impl: field values in the same order as `COLUMNS`
/// - `COL_*: &'static str` - Column name constants
/// - `fn field(column: &str) -> FieldRef` - Typed column reference
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the type name; may be `schema.table`)
/// - `#[orm(alias = "a")]` - Default alias (defaults to the type name)
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field out of `COLUMNS` and `values()`
///
/// Every non-skipped field must be `Clone` and convert into `sqlfold::Value`.
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
