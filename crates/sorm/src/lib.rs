//! # sorm
//!
//! A small entity mapper: structs in, `INSERT` / `UPDATE` / `SELECT` out.
//!
//! ## Features
//!
//! - **Derived mapping**: `#[derive(Entity)]` describes table, columns and primary key
//! - **Dirty tracking**: updates carry only the fields changed since the last load or save
//! - **Cascading relations**: related entities are saved first and referenced by key
//! - **Driver agnostic**: anything implementing [`Executor`]; `tokio-postgres` built in
//! - **Query monitoring**: timing, logging and timeouts via [`InstrumentedExecutor`]
//!
//! ## Example
//!
//! ```ignore
//! use sorm::prelude::*;
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
//! let session = Session::postgres(client);
//!
//! let mut test = TestEntity { name: "Jake".into(), ..Default::default() };
//! session.save(&mut test).await?;          // INSERT INTO test (name) VALUES ($1) RETURNING test_id
//! assert!(test.is_valid());
//!
//! test.name = "Majkl".into();
//! session.save(&mut test).await?;          // UPDATE test SET name = $1 WHERE test_id = $2
//!
//! let mut again = TestEntity::default();
//! session.load_by_primary(&mut again, test.test_id).await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod ident;
pub mod mock;
pub mod monitor;
pub mod postgres;
pub mod prelude;
pub mod primary;
pub mod session;
pub mod state;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::Statement;
pub use client::{ExecResult, Executor, Rows};
pub use config::{DEFAULT_MAX_DEPTH, OrmConfig};
pub use dialect::Dialect;
pub use entity::{Entity, EntityDescriptor, FieldDescriptor, FieldKind, table_name_for};
pub use error::{OrmError, OrmResult};
pub use ident::Ident;
pub use mock::{MockExecutor, RecordedStatement};
pub use monitor::{
    InstrumentedExecutor, LoggingMonitor, MonitorConfig, NoopMonitor, QueryContext, QueryMonitor,
    QueryResult, QueryType,
};
pub use primary::{PrimaryKey, is_valid, primary_value, set_primary};
pub use session::{SaveOutcome, Session};
pub use state::{
    EntityState, PersistState, Snapshot, capture_snapshot, changed_fields, relation_needs_save,
};
pub use value::{FromValue, ToValue, Value};

// Used by `#[derive(Entity)]` expansions.
#[doc(hidden)]
pub use futures_core::future::BoxFuture;

pub use tokio_postgres;

#[cfg(feature = "derive")]
pub use sorm_derive::Entity;

/// Save `entity` through `client` with the default configuration.
///
/// Shorthand for `Session::new(client).save(entity)`.
pub async fn save<C: Executor, T: Entity>(client: C, entity: &mut T) -> OrmResult<SaveOutcome> {
    Session::new(client).save(entity).await
}

/// Load the first row where `column = value` into `entity` with the default configuration.
pub async fn load_entity<C, T, V>(
    client: C,
    entity: &mut T,
    column: &str,
    value: V,
) -> OrmResult<bool>
where
    C: Executor,
    T: Entity,
    V: Into<Value>,
{
    Session::new(client).load_entity(entity, column, value).await
}
