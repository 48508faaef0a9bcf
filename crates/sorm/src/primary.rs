//! Primary key access.
//!
//! An entity is "valid" when its primary field holds a nonzero integer. Entities without a
//! primary field are never valid.

use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// Integer types usable as a primary key.
pub trait PrimaryKey: Copy + Send + Sync {
    /// Convert a generated id, reinterpreting sign and width like an `as` cast.
    fn from_id(id: i64) -> Self;
}

macro_rules! impl_primary_key {
    ($($t:ty),*) => {$(
        impl PrimaryKey for $t {
            fn from_id(id: i64) -> Self {
                id as $t
            }
        }
    )*};
}

impl_primary_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Current primary key value, or `Value::Null` when there is no primary field.
pub fn primary_value<T: Entity>(entity: &T) -> Value {
    match T::descriptor().primary_index() {
        Some(i) => entity.field_value(i),
        None => Value::Null,
    }
}

/// Whether the primary field holds a nonzero integer.
pub fn is_valid<T: Entity>(entity: &T) -> bool {
    match primary_value(entity) {
        Value::Int(n) => n != 0,
        Value::UInt(n) => n != 0,
        _ => false,
    }
}

/// Write `id` into the primary field.
pub fn set_primary<T: Entity>(entity: &mut T, id: i64) -> OrmResult<()> {
    let desc = T::descriptor();
    if desc.primary_index().is_none() {
        return Err(OrmError::InvalidPrimary(desc.type_name));
    }
    entity.write_primary(id)
}
