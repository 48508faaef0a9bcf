use proc_macro2::Span;
use syn::{Error, Result};

pub(crate) fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn check_sql_ident(value: &str, span: Span, what: &str) -> Result<()> {
    if is_valid_sql_ident(value) {
        Ok(())
    } else {
        Err(Error::new(
            span,
            format!("{what} '{value}' is not a valid SQL identifier (expected [A-Za-z_][A-Za-z0-9_]*)"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_valid_sql_ident("test_id"));
        assert!(is_valid_sql_ident("_hidden"));
        assert!(is_valid_sql_ident("Col2"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_valid_sql_ident(""));
        assert!(!is_valid_sql_ident("2col"));
        assert!(!is_valid_sql_ident("a b"));
        assert!(!is_valid_sql_ident("a;drop"));
        assert!(!is_valid_sql_ident("schema.table"));
    }
}
