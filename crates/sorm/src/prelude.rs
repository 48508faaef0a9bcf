//! Convenient imports for typical `sorm` usage.
//!
//! ```ignore
//! use sorm::prelude::*;
//! ```

pub use crate::{
    Entity, Executor, OrmConfig, OrmError, OrmResult, PersistState, SaveOutcome, Session, Value,
};

pub use crate::{Dialect, EntityState, MockExecutor};
