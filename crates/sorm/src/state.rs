//! Persistence state and dirty tracking.
//!
//! Each entity embeds a [`PersistState`]. After every successful load or save the
//! current values of all persisted fields are captured into a [`Snapshot`]; UPDATEs only
//! carry the fields that differ from it.

use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::primary::{is_valid, primary_value};
use crate::value::Value;

/// Lifecycle of an entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Never loaded or saved.
    Unsaved,
    /// Loaded or saved; a snapshot exists.
    Persisted,
    /// Removed through `Session::delete`.
    Deleted,
}

/// Values of all persisted fields at the last successful load or save.
///
/// Indexed like [`EntityDescriptor::fields`](crate::EntityDescriptor::fields).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    values: Vec<Value>,
}

impl Snapshot {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Persistence bookkeeping embedded in every entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistState {
    snapshot: Option<Snapshot>,
    deleted: bool,
}

impl PersistState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EntityState {
        if self.deleted {
            EntityState::Deleted
        } else if self.snapshot.is_some() {
            EntityState::Persisted
        } else {
            EntityState::Unsaved
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.deleted = false;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.snapshot = None;
        self.deleted = true;
    }

    /// Forget the snapshot; the next save inserts again.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.deleted = false;
    }
}

/// Record the current value of every persisted field, replacing any previous snapshot.
pub fn capture_snapshot<T: Entity>(entity: &mut T) {
    let snapshot = Snapshot {
        values: (0..T::descriptor().fields.len())
            .map(|i| entity.field_value(i))
            .collect(),
    };
    entity.persist_state_mut().replace_snapshot(snapshot);
}

/// Names of persisted fields whose value differs from the snapshot, in declaration order.
pub fn changed_fields<T: Entity>(entity: &T) -> OrmResult<Vec<&'static str>> {
    Ok(changed_indices(entity)?
        .into_iter()
        .map(|i| T::descriptor().fields[i].name)
        .collect())
}

/// Whether saving `owner` must first save `related`, the entity held by relation field
/// `index`.
///
/// Types without a primary field are never cascaded: their key cannot be stored. An owner
/// headed for INSERT saves every related entity. An owner headed for UPDATE only saves
/// related entities that are unsaved themselves or whose key differs from the owner's
/// snapshot, so a save with nothing changed writes nothing.
pub fn relation_needs_save<T: Entity, R: Entity>(owner: &T, index: usize, related: &R) -> bool {
    if R::descriptor().primary_index().is_none() {
        return false;
    }
    if !is_valid(related) || !related.persist_state().has_snapshot() {
        return true;
    }
    match owner.persist_state().snapshot() {
        Some(snapshot) if is_valid(owner) => snapshot.get(index) != Some(&primary_value(related)),
        _ => true,
    }
}

pub(crate) fn changed_indices<T: Entity>(entity: &T) -> OrmResult<Vec<usize>> {
    let desc = T::descriptor();
    let snapshot = entity
        .persist_state()
        .snapshot()
        .filter(|s| s.len() == desc.fields.len())
        .ok_or(OrmError::MissingSnapshot(desc.type_name))?;

    Ok((0..desc.fields.len())
        .filter(|&i| snapshot.values[i] != entity.field_value(i))
        .collect())
}
