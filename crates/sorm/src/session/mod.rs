//! Sessions: an executor plus configuration, exposing load / save / delete.
//!
//! ```ignore
//! use sorm::{Session, SaveOutcome};
//!
//! let session = Session::new(&executor);
//! let mut test = TestEntity { name: "Jake".into(), ..Default::default() };
//! assert!(matches!(session.save(&mut test).await?, SaveOutcome::Inserted { .. }));
//!
//! test.name = "Majkl".into();
//! session.save(&mut test).await?; // UPDATE test SET name = ? WHERE test_id = ?
//! ```

mod delete;
mod load;
mod save;


pub use save::SaveOutcome;

use crate::client::Executor;
use crate::config::OrmConfig;

/// An executor with the configuration used to render and run entity statements.
pub struct Session<C> {
    client: C,
    config: OrmConfig,
}

impl<C: Executor> Session<C> {
    /// Create a session with the default configuration.
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: OrmConfig::default(),
        }
    }

    /// Set the session configuration.
    pub fn with_config(mut self, config: OrmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    /// Get a reference to the inner executor.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the inner executor, consuming the session.
    pub fn into_inner(self) -> C {
        self.client
    }
}
