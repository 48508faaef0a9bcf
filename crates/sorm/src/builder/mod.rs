//! Statement generation for entities.
//!
//! Builders are pure: they read an entity and its descriptor and produce a [`Statement`].
//! Cascading saves of related entities happen in the session before a builder runs, so
//! relation fields already report their related primary key here.

mod delete;
mod insert;
mod select;
mod update;


pub use delete::build_delete;
pub use insert::build_insert;
pub use select::build_select;
pub use update::build_update;

use crate::dialect::Dialect;
use crate::ident::write_trusted;
use crate::monitor::QueryType;
use crate::value::Value;

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
    pub kind: QueryType,
    /// Rust names of the fields written by an INSERT or UPDATE.
    pub fields: Vec<&'static str>,
    /// The statement ends in `RETURNING <primary>`.
    pub returns_key: bool,
}

/// Accumulates SQL text and parameters, numbering placeholders per dialect.
pub(crate) struct SqlWriter {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl SqlWriter {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::with_capacity(64),
            params: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Append a descriptor-provided table or column name.
    pub(crate) fn push_name(&mut self, name: &str) {
        write_trusted(self.dialect, name, &mut self.sql);
    }

    pub(crate) fn push_param(&mut self, value: Value) {
        self.params.push(value);
        self.dialect.write_placeholder(&mut self.sql, self.params.len());
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn sql_mut(&mut self) -> &mut String {
        &mut self.sql
    }

    pub(crate) fn finish(self, kind: QueryType) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
            kind,
            fields: Vec::new(),
            returns_key: false,
        }
    }
}
