//! Derive macros for sorm
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod entity;
mod sql_ident;

/// Derive `sorm::Entity` for a struct.
///
/// # Example
///
/// ```ignore
/// use sorm::{Entity, PersistState};
///
/// #[derive(Debug, Default, Entity)]
/// struct TestEntity {
///     state: PersistState,
///     #[orm(column = "test_id", primary)]
///     test_id: i64,
///     #[orm(column = "name")]
///     name: String,
///     #[orm(column = "owner_id", relation)]
///     owner: Option<Box<OwnerEntity>>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Override the table name (default: type name without
///   `Entity`, lower-cased)
/// - `#[orm(column = "name")]` - Persist the field in this column; fields without a
///   column are not persisted
/// - `#[orm(primary)]` / `#[orm(primary = "true")]` - Mark the integer primary key
/// - `#[orm(relation)]` - The field is `Option<Box<T>>` / `Option<T>` of another entity;
///   the column stores that entity's primary key
/// - `#[orm(state)]` - The `PersistState` field (detected by type name otherwise)
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
