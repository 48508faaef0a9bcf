//! Attribute parsing for the Entity derive macro.
//!
//! Struct level: `#[orm(table = "...")]`.
//! Field level: `#[orm(column = "...", primary, relation, state)]`, where `primary` also
//! accepts `primary = true|false` and `primary = "<bool string>"`.

use syn::{DeriveInput, Lit, LitStr, Result, Token};

/// Field-level `#[orm(...)]` options, merged across repeated attributes.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub column: Option<LitStr>,
    pub primary: bool,
    pub relation: bool,
    pub state: bool,
}

/// Parse a boolean string the way `1 t T TRUE true True` / `0 f F FALSE false False` are read.
pub(super) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;

            if input.peek(Token![=]) {
                let _: Token![=] = input.parse()?;
                let value: Lit = input.parse()?;
                match (key.to_string().as_str(), value) {
                    ("column", Lit::Str(s)) => attr.column = Some(s),
                    ("primary", Lit::Bool(b)) => attr.primary = b.value,
                    // An unparsable marker means "not primary".
                    ("primary", Lit::Str(s)) => {
                        attr.primary = parse_bool(&s.value()).unwrap_or(false)
                    }
                    (other, value) => {
                        return Err(syn::Error::new_spanned(
                            value,
                            format!("unsupported value for orm attribute `{other}`"),
                        ));
                    }
                }
            } else {
                match key.to_string().as_str() {
                    "primary" => attr.primary = true,
                    "relation" => attr.relation = true,
                    "state" => attr.state = true,
                    other => {
                        return Err(syn::Error::new(
                            key.span(),
                            format!("unknown orm attribute `{other}`"),
                        ));
                    }
                }
            }

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        if !input.is_empty() {
            return Err(input.error("expected `,`"));
        }
        Ok(attr)
    }
}

/// Merge every `#[orm(...)]` on a field.
pub(super) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
        merged.primary |= parsed.primary;
        merged.relation |= parsed.relation;
        merged.state |= parsed.state;
    }
    Ok(merged)
}

/// Extract the table name from struct-level `#[orm(table = "...")]`, if present.
pub(super) fn table_override(input: &DeriveInput) -> Result<Option<LitStr>> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                table = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported struct-level orm attribute"))
            }
        })?;
    }
    Ok(table)
}

/// Default table name: the type name with every `Entity` removed, lower-cased.
pub(super) fn default_table_name(type_name: &str) -> String {
    type_name.replace("Entity", "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn first_field(input: DeriveInput) -> syn::Field {
        let syn::Data::Struct(data) = input.data else {
            panic!("expected a struct");
        };
        data.fields.into_iter().next().unwrap()
    }

    fn parse(input: DeriveInput) -> FieldAttr {
        field_attr(&first_field(input)).unwrap()
    }

    #[test]
    fn column_and_primary_flag() {
        let attr = parse(parse_quote! {
            struct S {
                #[orm(column = "test_id", primary)]
                test_id: i64,
            }
        });
        assert_eq!(attr.column.unwrap().value(), "test_id");
        assert!(attr.primary);
        assert!(!attr.relation);
    }

    #[test]
    fn primary_string_values() {
        let attr = parse(parse_quote! { struct S { #[orm(column = "id", primary = "true")] id: i64 } });
        assert!(attr.primary);
        let attr = parse(parse_quote! { struct S { #[orm(column = "id", primary = "0")] id: i64 } });
        assert!(!attr.primary);
        let attr = parse(parse_quote! { struct S { #[orm(column = "id", primary = "yes")] id: i64 } });
        assert!(!attr.primary);
        let attr = parse(parse_quote! { struct S { #[orm(column = "id", primary = false)] id: i64 } });
        assert!(!attr.primary);
    }

    #[test]
    fn repeated_attributes_merge() {
        let attr = parse(parse_quote! {
            struct S {
                #[orm(column = "owner_id")]
                #[orm(relation)]
                owner: Option<Box<Owner>>,
            }
        });
        assert_eq!(attr.column.unwrap().value(), "owner_id");
        assert!(attr.relation);
    }

    #[test]
    fn unknown_keys_are_errors() {
        let field = first_field(parse_quote! { struct S { #[orm(colum = "x")] x: i32 } });
        assert!(field_attr(&field).is_err());
        let field = first_field(parse_quote! { struct S { #[orm(nullable)] x: i32 } });
        assert!(field_attr(&field).is_err());
    }

    #[test]
    fn bool_strings() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn table_names() {
        assert_eq!(default_table_name("TestEntity"), "test");
        assert_eq!(default_table_name("EntityUserEntity"), "user");
        assert_eq!(default_table_name("Order"), "order");

        let input: DeriveInput = parse_quote! {
            #[orm(table = "people")]
            struct Person { state: PersistState }
        };
        assert_eq!(table_override(&input).unwrap().unwrap().value(), "people");
    }
}
