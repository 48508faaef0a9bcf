//! Safe SQL identifier handling.
//!
//! Column names handed to the loader at runtime are parsed into an [`Ident`] before they
//! reach a statement, so they cannot carry SQL.
//!
//! Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*`. Quoted parts may hold anything
//! but NUL, with `""` standing for a literal quote.
//!
//! # Example
//! ```ignore
//! use sorm::{Dialect, Ident};
//!
//! let c = Ident::parse("test_id")?;
//! assert_eq!(c.render(Dialect::MySql), "`test_id`");
//! # Ok::<(), sorm::OrmError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

impl IdentPart {
    fn name(&self) -> &str {
        match self {
            IdentPart::Unquoted(s) | IdentPart::Quoted(s) => s,
        }
    }
}

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse `column`, `table.column` or a quoted form such as `public."UserTable".id`.
    pub fn parse(s: &str) -> OrmResult<Self> {
        if s.is_empty() {
            return Err(OrmError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(OrmError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut rest = s;
        loop {
            let (part, tail) = split_part(rest)?;
            parts.push(part);
            match tail.strip_prefix('.') {
                Some("") => return Err(OrmError::validation("Trailing '.' in identifier")),
                Some(next) => rest = next,
                None if tail.is_empty() => break,
                None => {
                    return Err(OrmError::validation(format!(
                        "Expected '.' between identifier parts, got {tail:?}"
                    )));
                }
            }
        }
        Ok(Self { parts })
    }

    /// Render the identifier for the given dialect.
    pub fn render(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: Dialect, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match (dialect, part) {
                (Dialect::MySql, part) => push_quoted(out, part.name(), '`'),
                (_, IdentPart::Unquoted(s)) => out.push_str(s),
                (_, IdentPart::Quoted(s)) => push_quoted(out, s, '"'),
            }
        }
    }
}

/// Split one identifier part off the front of `input`.
fn split_part(input: &str) -> OrmResult<(IdentPart, &str)> {
    if let Some(quoted) = input.strip_prefix('"') {
        let mut name = String::new();
        let mut iter = quoted.char_indices().peekable();
        while let Some((i, c)) = iter.next() {
            if c != '"' {
                name.push(c);
                continue;
            }
            if matches!(iter.peek(), Some((_, '"'))) {
                iter.next();
                name.push('"');
                continue;
            }
            if name.is_empty() {
                return Err(OrmError::validation("Empty quoted identifier"));
            }
            return Ok((IdentPart::Quoted(name), &quoted[i + 1..]));
        }
        return Err(OrmError::validation("Unclosed quoted identifier"));
    }

    let end = input.find('.').unwrap_or(input.len());
    let (name, tail) = input.split_at(end);
    let mut chars = name.chars();
    match chars.next() {
        None => return Err(OrmError::validation("Empty identifier segment")),
        Some(c) if c != '_' && !c.is_ascii_alphabetic() => {
            return Err(OrmError::validation(format!(
                "Invalid character in identifier: '{c}'"
            )));
        }
        Some(_) => {}
    }
    if let Some(c) = chars.find(|&c| c != '_' && c != '$' && !c.is_ascii_alphanumeric()) {
        return Err(OrmError::validation(format!(
            "Invalid character in identifier: '{c}'"
        )));
    }
    Ok((IdentPart::Unquoted(name.to_string()), tail))
}

fn push_quoted(out: &mut String, name: &str, quote: char) {
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}

/// Render a name that is already known to be a valid identifier.
///
/// Descriptor table and column names are validated by the derive, so they skip parsing.
pub(crate) fn write_trusted(dialect: Dialect, name: &str, out: &mut String) {
    match dialect {
        Dialect::MySql => push_quoted(out, name, '`'),
        Dialect::Generic | Dialect::Postgres => out.push_str(name),
    }
}
