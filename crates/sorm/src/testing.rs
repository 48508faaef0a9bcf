//! Hand-written entities for unit tests; they mirror what `#[derive(Entity)]` expands to.

use crate::client::Executor;
use crate::entity::{Entity, EntityDescriptor, FieldDescriptor};
use crate::error::OrmResult;
use crate::primary::{PrimaryKey, primary_value};
use crate::session::Session;
use crate::state::{PersistState, relation_needs_save};
use crate::value::{FromValue, ToValue, Value};
use futures_core::future::BoxFuture;

fn assign<T: FromValue>(slot: &mut T, value: Value) -> bool {
    match T::from_value(value) {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Note {
    pub state: PersistState,
    pub id: i64,
    pub body: String,
    pub pinned: bool,
    /// Not persisted.
    pub draft: Option<String>,
}

impl Note {
    pub fn new(id: i64, body: &str) -> Self {
        Self {
            id,
            body: body.to_string(),
            ..Self::default()
        }
    }
}

static NOTE_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::primary("id", "id"),
    FieldDescriptor::scalar("body", "body"),
    FieldDescriptor::scalar("pinned", "pinned"),
];

static NOTE: EntityDescriptor = EntityDescriptor {
    type_name: "Note",
    table: "note",
    fields: &NOTE_FIELDS,
};

impl Entity for Note {
    fn descriptor() -> &'static EntityDescriptor {
        &NOTE
    }

    fn persist_state(&self) -> &PersistState {
        &self.state
    }

    fn persist_state_mut(&mut self) -> &mut PersistState {
        &mut self.state
    }

    fn field_value(&self, index: usize) -> Value {
        match index {
            0 => self.id.to_value(),
            1 => self.body.to_value(),
            2 => self.pinned.to_value(),
            _ => Value::Null,
        }
    }

    fn assign_field(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.id, value),
            1 => assign(&mut self.body, value),
            2 => assign(&mut self.pinned, value),
            _ => false,
        }
    }

    fn write_primary(&mut self, id: i64) -> OrmResult<()> {
        self.id = i64::from_id(id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Loose {
    pub state: PersistState,
    pub a: String,
    pub b: i32,
}

static LOOSE_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::scalar("a", "a"),
    FieldDescriptor::scalar("b", "b"),
];

static LOOSE: EntityDescriptor = EntityDescriptor {
    type_name: "Loose",
    table: "loose",
    fields: &LOOSE_FIELDS,
};

impl Entity for Loose {
    fn descriptor() -> &'static EntityDescriptor {
        &LOOSE
    }

    fn persist_state(&self) -> &PersistState {
        &self.state
    }

    fn persist_state_mut(&mut self) -> &mut PersistState {
        &mut self.state
    }

    fn field_value(&self, index: usize) -> Value {
        match index {
            0 => self.a.to_value(),
            1 => self.b.to_value(),
            _ => Value::Null,
        }
    }

    fn assign_field(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.a, value),
            1 => assign(&mut self.b, value),
            _ => false,
        }
    }
}

/// A pin refers to a note through the `note_id` column.
#[derive(Debug, Default)]
pub(crate) struct Pin {
    pub state: PersistState,
    pub id: u32,
    pub label: String,
    pub note: Option<Box<Note>>,
}

static PIN_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::primary("id", "id"),
    FieldDescriptor::scalar("label", "label"),
    FieldDescriptor::relation("note", "note_id"),
];

static PIN: EntityDescriptor = EntityDescriptor {
    type_name: "Pin",
    table: "pin",
    fields: &PIN_FIELDS,
};

impl Entity for Pin {
    fn descriptor() -> &'static EntityDescriptor {
        &PIN
    }

    fn persist_state(&self) -> &PersistState {
        &self.state
    }

    fn persist_state_mut(&mut self) -> &mut PersistState {
        &mut self.state
    }

    fn field_value(&self, index: usize) -> Value {
        match index {
            0 => self.id.to_value(),
            1 => self.label.to_value(),
            2 => self
                .note
                .as_deref()
                .map(primary_value)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    fn assign_field(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.id, value),
            1 => assign(&mut self.label, value),
            _ => false,
        }
    }

    fn write_primary(&mut self, id: i64) -> OrmResult<()> {
        self.id = u32::from_id(id);
        Ok(())
    }

    fn save_relations<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<()>> {
        Box::pin(async move {
            let cascade = self
                .note
                .as_deref()
                .is_some_and(|related| relation_needs_save(&*self, 2, related));
            if cascade {
                if let Some(note) = self.note.as_deref_mut() {
                    session.save_nested(note, depth).await?;
                }
            }
            Ok(())
        })
    }

    fn load_relation<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        index: usize,
        key: Value,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<bool>> {
        Box::pin(async move {
            if index != 2 {
                return Ok(false);
            }
            let mut related = Note::default();
            if session.load_related(&mut related, key, depth).await? {
                self.note = Some(Box::new(related));
                return Ok(true);
            }
            Ok(false)
        })
    }
}

/// A self-referencing entity for depth-bound tests.
#[derive(Debug, Default)]
pub(crate) struct Node {
    pub state: PersistState,
    pub id: i64,
    pub parent: Option<Box<Node>>,
}

impl Node {
    /// A chain of `len` unsaved nodes, each the parent of the previous one.
    pub fn chain(len: usize) -> Self {
        let mut node = Node::default();
        for _ in 1..len {
            node = Node {
                parent: Some(Box::new(node)),
                ..Node::default()
            };
        }
        node
    }
}

static NODE_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::primary("id", "id"),
    FieldDescriptor::relation("parent", "parent_id"),
];

static NODE: EntityDescriptor = EntityDescriptor {
    type_name: "Node",
    table: "node",
    fields: &NODE_FIELDS,
};

impl Entity for Node {
    fn descriptor() -> &'static EntityDescriptor {
        &NODE
    }

    fn persist_state(&self) -> &PersistState {
        &self.state
    }

    fn persist_state_mut(&mut self) -> &mut PersistState {
        &mut self.state
    }

    fn field_value(&self, index: usize) -> Value {
        match index {
            0 => self.id.to_value(),
            1 => self
                .parent
                .as_deref()
                .map(primary_value)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    fn assign_field(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.id, value),
            _ => false,
        }
    }

    fn write_primary(&mut self, id: i64) -> OrmResult<()> {
        self.id = id;
        Ok(())
    }

    fn save_relations<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<()>> {
        Box::pin(async move {
            let cascade = self
                .parent
                .as_deref()
                .is_some_and(|related| relation_needs_save(&*self, 1, related));
            if cascade {
                if let Some(parent) = self.parent.as_deref_mut() {
                    session.save_nested(parent, depth).await?;
                }
            }
            Ok(())
        })
    }

    fn load_relation<'a, C: Executor>(
        &'a mut self,
        session: &'a Session<C>,
        index: usize,
        key: Value,
        depth: usize,
    ) -> BoxFuture<'a, OrmResult<bool>> {
        Box::pin(async move {
            if index != 1 {
                return Ok(false);
            }
            let mut related = Node::default();
            if session.load_related(&mut related, key, depth).await? {
                self.parent = Some(Box::new(related));
                return Ok(true);
            }
            Ok(false)
        })
    }
}
