//! Session configuration.

use crate::dialect::Dialect;

/// Default bound on relation recursion for cascading saves and nested loads.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Configuration carried by a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct OrmConfig {
    /// SQL dialect used when rendering statements.
    pub dialect: Dialect,
    /// Maximum relation depth followed by cascading saves and nested loads.
    pub max_depth: usize,
    /// Render the UPDATE primary key as an inline integer literal instead of a bound
    /// parameter.
    pub inline_update_key: bool,
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            inline_update_key: false,
        }
    }
}

impl OrmConfig {
    /// Create a new configuration with defaults (generic dialect, bound update key).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the relation depth bound.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Embed integer primary keys literally in UPDATE's WHERE clause.
    ///
    /// Only needed when statement text must match `... WHERE id = 42` exactly.
    pub fn inline_update_key(mut self, inline: bool) -> Self {
        self.inline_update_key = inline;
        self
    }
}
