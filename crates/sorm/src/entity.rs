//! Entity descriptors and the [`Entity`] trait.
//!
//! Every entity carries a static [`EntityDescriptor`]: the table it maps to and the list
//! of persisted fields (those with a column), in declaration order. The descriptor is what
//! the query builder, loader and snapshot tracker walk; field indices used throughout the
//! crate are positions in [`EntityDescriptor::fields`].
//!
//! Descriptors are normally generated by `#[derive(Entity)]`:
//!
//! ```ignore
//! use sorm::{Entity, PersistState};
//!
//! #[derive(Debug, Default, Entity)]
//! struct TestEntity {
//!     state: PersistState,
//!     #[orm(column = "test_id", primary)]
//!     test_id: i64,
//!     #[orm(column = "name")]
//!     name: String,
//! }
//!
//! assert_eq!(TestEntity::descriptor().table, "test");
//! ```

use crate::client::Executor;
use crate::error::{OrmError, OrmResult};
use crate::session::Session;
use crate::state::PersistState;
use crate::value::Value;
use futures_core::future::BoxFuture;

/// How a persisted field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value converted through `ToValue` / `FromValue`.
    Scalar,
    /// A related entity; the column holds the related entity's primary key.
    Relation,
}

/// A persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Column name.
    pub column: &'static str,
    pub primary: bool,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn scalar(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            primary: false,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn primary(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            primary: true,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn relation(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            primary: false,
            kind: FieldKind::Relation,
        }
    }

    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Relation
    }
}

/// Static mapping metadata of an entity type.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Rust type name, used in errors and logs.
    pub type_name: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    /// Index of the primary field, if any.
    pub fn primary_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.primary)
    }

    pub fn primary(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.primary)
    }

    pub fn primary_column(&self) -> Option<&'static str> {
        self.primary().map(|f| f.column)
    }

    /// Index of the field mapped to `column`.
    pub fn field_by_column(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.column == column)
    }

    /// Index of the field with Rust name `name`.
    pub fn field_by_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }
}

/// Derive a table name from a type name.
///
/// Every `Entity` substring is removed and the rest lower-cased, so `TestEntity` maps to
/// `test`. `#[derive(Entity)]` applies the same rule at compile time.
pub fn table_name_for(type_name: &str) -> String {
    let short = type_name.rsplit("::").next().unwrap_or(type_name);
    short.replace("Entity", "").to_lowercase()
}

/// A struct mapped to a table.
///
/// Implemented by `#[derive(Entity)]`. Hand-written implementations must keep
/// [`Entity::field_value`] and [`Entity::assign_field`] consistent with the indices of
/// [`Entity::descriptor`].
pub trait Entity: Send + Sync + Sized {
    fn descriptor() -> &'static EntityDescriptor;

    fn persist_state(&self) -> &PersistState;

    fn persist_state_mut(&mut self) -> &mut PersistState;

    /// Current value of the persisted field at `index`.
    ///
    /// Relation fields report the related entity's primary key, or `Value::Null`.
    fn field_value(&self, index: usize) -> Value;

    /// Assign a loaded value to the scalar field at `index`.
    ///
    /// Returns `false` when the value does not fit the field; the field is left as it was.
    fn assign_field(&mut self, index: usize, value: Value) -> bool;

    /// Write a generated key into the primary field.
    fn write_primary(&mut self, id: i64) -> OrmResult<()> {
        let _ = id;
        Err(OrmError::InvalidPrimary(Self::descriptor().type_name))
    }

    /// Save every present related entity, deepest first.
    fn save_relations<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<()>> {
        let _ = (session, depth);
        Box::pin(async { Ok(()) })
    }

    /// Load the related entity for relation field `index` using its raw key.
    ///
    /// Returns `Ok(true)` when the related row was found and attached.
    fn load_relation<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        index: usize,
        key: Value,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<bool>> {
        let _ = (session, index, key, depth);
        Box::pin(async { Ok(false) })
    }

    /// Names of persisted fields whose value differs from the snapshot.
    fn changed_fields(&self) -> OrmResult<Vec<&'static str>> {
        crate::state::changed_fields(self)
    }

    /// Whether the primary key is set.
    fn is_valid(&self) -> bool {
        crate::primary::is_valid(self)
    }
}
