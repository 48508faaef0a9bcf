//! SQL dialect conventions: placeholders, identifier quoting, key retrieval.

use std::fmt::Write;

/// Placeholder and quoting conventions of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Unquoted identifiers and `?` placeholders.
    #[default]
    Generic,
    /// Backtick-quoted identifiers and `?` placeholders.
    MySql,
    /// `$1..$n` placeholders; inserts read the generated key back via `RETURNING`.
    Postgres,
}

impl Dialect {
    /// Append the placeholder for the `n`-th (1-based) bound parameter.
    pub fn write_placeholder(self, out: &mut String, n: usize) {
        match self {
            Dialect::Generic | Dialect::MySql => out.push('?'),
            Dialect::Postgres => {
                let _ = write!(out, "${n}");
            }
        }
    }

    /// Whether generated keys come back through `INSERT ... RETURNING`.
    pub fn uses_returning(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}
