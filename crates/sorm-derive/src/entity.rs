//! Entity derive macro implementation
//!
//! Generates a static `EntityDescriptor` plus the `sorm::Entity` accessors. Field
//! indices in the generated code follow the order of persisted fields in the struct.

mod attrs;

use crate::common::syn_types::{box_inner, is_named, option_inner};
use crate::sql_ident::check_sql_ident;
use attrs::{default_table_name, field_attr, table_override};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

enum Kind {
    Scalar,
    /// `Option<Box<U>>` when `boxed`, otherwise `Option<U>`.
    Relation { target: syn::Type, boxed: bool },
}

struct Persisted {
    ident: syn::Ident,
    ty: syn::Type,
    column: String,
    primary: bool,
    kind: Kind,
}

fn relation_target(ty: &syn::Type) -> Option<(syn::Type, bool)> {
    let inner = option_inner(ty)?;
    Some(match box_inner(inner) {
        Some(target) => (target.clone(), true),
        None => (inner.clone(), false),
    })
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let table = match table_override(&input)? {
        Some(lit) => {
            let table = lit.value();
            check_sql_ident(&table, lit.span(), "table name")?;
            table
        }
        None => {
            let table = default_table_name(&name.unraw().to_string());
            check_sql_ident(&table, name.span(), "derived table name")?;
            table
        }
    };

    let mut state_field: Option<syn::Ident> = None;
    let mut persisted: Vec<Persisted> = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let attr = field_attr(field)?;

        if attr.state || (attr.column.is_none() && is_named(&field.ty, "PersistState")) {
            if state_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Entity must have exactly one PersistState field",
                ));
            }
            state_field = Some(ident);
            continue;
        }

        let column = match &attr.column {
            Some(lit) if !lit.value().is_empty() => {
                check_sql_ident(&lit.value(), lit.span(), "column name")?;
                lit.value()
            }
            _ => {
                if attr.primary || attr.relation {
                    return Err(syn::Error::new_spanned(
                        field,
                        "primary and relation fields need #[orm(column = \"...\")]",
                    ));
                }
                continue;
            }
        };

        if persisted.iter().any(|p| p.column == column) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column '{column}'"),
            ));
        }

        let kind = if attr.relation {
            if attr.primary {
                return Err(syn::Error::new_spanned(
                    field,
                    "a relation field cannot be the primary key",
                ));
            }
            let Some((target, boxed)) = relation_target(&field.ty) else {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "relation fields must be Option<Box<T>> or Option<T> where T: Entity",
                ));
            };
            Kind::Relation { target, boxed }
        } else {
            Kind::Scalar
        };

        if attr.primary && persisted.iter().any(|p| p.primary) {
            return Err(syn::Error::new_spanned(
                field,
                "Entity allows at most one #[orm(primary)] field",
            ));
        }

        persisted.push(Persisted {
            ident,
            ty: field.ty.clone(),
            column,
            primary: attr.primary,
            kind,
        });
    }

    let Some(state_field) = state_field else {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity requires a PersistState field (or a field marked #[orm(state)])",
        ));
    };

    let type_name = name.unraw().to_string();
    let field_count = persisted.len();

    let descriptors = persisted.iter().map(|p| {
        let field_name = p.ident.unraw().to_string();
        let column = &p.column;
        match (&p.kind, p.primary) {
            (Kind::Relation { .. }, _) => {
                quote! { ::sorm::FieldDescriptor::relation(#field_name, #column) }
            }
            (Kind::Scalar, true) => {
                quote! { ::sorm::FieldDescriptor::primary(#field_name, #column) }
            }
            (Kind::Scalar, false) => {
                quote! { ::sorm::FieldDescriptor::scalar(#field_name, #column) }
            }
        }
    });

    let value_arms = persisted.iter().enumerate().map(|(i, p)| {
        let ident = &p.ident;
        match &p.kind {
            Kind::Scalar => quote! {
                #i => ::sorm::ToValue::to_value(&self.#ident),
            },
            Kind::Relation { boxed: true, .. } => quote! {
                #i => self.#ident.as_deref().map_or(::sorm::Value::Null, ::sorm::primary_value),
            },
            Kind::Relation { boxed: false, .. } => quote! {
                #i => self.#ident.as_ref().map_or(::sorm::Value::Null, ::sorm::primary_value),
            },
        }
    });

    let assign_arms = persisted.iter().enumerate().filter_map(|(i, p)| {
        let Kind::Scalar = p.kind else {
            return None;
        };
        let ident = &p.ident;
        let ty = &p.ty;
        Some(quote! {
            #i => match <#ty as ::sorm::FromValue>::from_value(value) {
                ::core::option::Option::Some(v) => {
                    self.#ident = v;
                    true
                }
                ::core::option::Option::None => false,
            },
        })
    });

    let write_primary = persisted.iter().find(|p| p.primary).map(|p| {
        let ident = &p.ident;
        let ty = &p.ty;
        quote! {
            fn write_primary(&mut self, id: i64) -> ::sorm::OrmResult<()> {
                self.#ident = <#ty as ::sorm::PrimaryKey>::from_id(id);
                ::core::result::Result::Ok(())
            }
        }
    });

    let relations: Vec<(usize, &Persisted, &syn::Type, bool)> = persisted
        .iter()
        .enumerate()
        .filter_map(|(i, p)| match &p.kind {
            Kind::Relation { target, boxed } => Some((i, p, target, *boxed)),
            Kind::Scalar => None,
        })
        .collect();

    let relation_methods = if relations.is_empty() {
        quote! {}
    } else {
        let saves = relations.iter().map(|(i, p, _, boxed)| {
            let ident = &p.ident;
            let (peek, access) = if *boxed {
                (
                    quote! { self.#ident.as_deref() },
                    quote! { self.#ident.as_deref_mut() },
                )
            } else {
                (
                    quote! { self.#ident.as_ref() },
                    quote! { self.#ident.as_mut() },
                )
            };
            quote! {
                let cascade = #peek
                    .is_some_and(|related| ::sorm::relation_needs_save(&*self, #i, related));
                if cascade {
                    if let ::core::option::Option::Some(related) = #access {
                        session.save_nested(related, depth).await?;
                    }
                }
            }
        });

        let loads = relations.iter().map(|(i, p, target, boxed)| {
            let ident = &p.ident;
            let wrap = if *boxed {
                quote! { ::std::boxed::Box::new(related) }
            } else {
                quote! { related }
            };
            quote! {
                #i => {
                    let mut related = <#target as ::core::default::Default>::default();
                    if session.load_related(&mut related, key, depth).await? {
                        self.#ident = ::core::option::Option::Some(#wrap);
                        return ::core::result::Result::Ok(true);
                    }
                    ::core::result::Result::Ok(false)
                }
            }
        });

        quote! {
            fn save_relations<'a, C: ::sorm::Executor>(
                &'a mut self,
                session: &'a ::sorm::Session<C>,
                depth: usize,
            ) -> ::sorm::BoxFuture<'a, ::sorm::OrmResult<()>> {
                ::std::boxed::Box::pin(async move {
                    #(#saves)*
                    ::core::result::Result::Ok(())
                })
            }

            fn load_relation<'a, C: ::sorm::Executor>(
                &'a mut self,
                session: &'a ::sorm::Session<C>,
                index: usize,
                key: ::sorm::Value,
                depth: usize,
            ) -> ::sorm::BoxFuture<'a, ::sorm::OrmResult<bool>> {
                ::std::boxed::Box::pin(async move {
                    match index {
                        #(#loads)*
                        _ => ::core::result::Result::Ok(false),
                    }
                })
            }
        }
    };

    Ok(quote! {
        const _: () = {
            static __SORM_FIELDS: [::sorm::FieldDescriptor; #field_count] = [
                #(#descriptors),*
            ];

            static __SORM_DESCRIPTOR: ::sorm::EntityDescriptor = ::sorm::EntityDescriptor {
                type_name: #type_name,
                table: #table,
                fields: &__SORM_FIELDS,
            };

            impl ::sorm::Entity for #name {
                fn descriptor() -> &'static ::sorm::EntityDescriptor {
                    &__SORM_DESCRIPTOR
                }

                fn persist_state(&self) -> &::sorm::PersistState {
                    &self.#state_field
                }

                fn persist_state_mut(&mut self) -> &mut ::sorm::PersistState {
                    &mut self.#state_field
                }

                fn field_value(&self, index: usize) -> ::sorm::Value {
                    match index {
                        #(#value_arms)*
                        _ => ::sorm::Value::Null,
                    }
                }

                #[allow(unused_variables)]
                fn assign_field(&mut self, index: usize, value: ::sorm::Value) -> bool {
                    match index {
                        #(#assign_arms)*
                        _ => false,
                    }
                }

                #write_primary

                #relation_methods
            }
        };
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        match expand(input) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn expands_basic_entity() {
        let input: DeriveInput = parse_quote! {
            struct TestEntity {
                state: PersistState,
                #[orm(column = "test_id", primary)]
                test_id: i64,
                #[orm(column = "name")]
                name: String,
                scratch: u8,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("\"test\""));
        assert!(out.contains("FieldDescriptor :: primary"));
        assert!(out.contains("FieldDescriptor :: scalar"));
        assert!(out.contains("\"test_id\""));
        assert!(!out.contains("scratch"));
        assert!(out.contains("fn write_primary"));
        assert!(!out.contains("fn save_relations"));
    }

    #[test]
    fn expands_relations() {
        let input: DeriveInput = parse_quote! {
            #[orm(table = "orders")]
            struct Order {
                #[orm(state)]
                meta: PersistState,
                #[orm(column = "customer_id", relation)]
                customer: Option<Box<Customer>>,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("\"orders\""));
        assert!(out.contains("FieldDescriptor :: relation"));
        assert!(out.contains("\"customer_id\""));
        assert!(out.contains("fn save_relations"));
        assert!(out.contains("relation_needs_save"));
        assert!(out.contains("fn load_relation"));
        assert!(!out.contains("fn write_primary"));
    }

    #[test]
    fn rejects_two_primaries() {
        let err = expand_err(parse_quote! {
            struct Twice {
                state: PersistState,
                #[orm(column = "a", primary)]
                a: i64,
                #[orm(column = "b", primary = "true")]
                b: i64,
            }
        });
        assert!(err.contains("at most one"));
    }

    #[test]
    fn rejects_missing_state() {
        let err = expand_err(parse_quote! {
            struct NoState {
                #[orm(column = "a")]
                a: i64,
            }
        });
        assert!(err.contains("PersistState"));
    }

    #[test]
    fn rejects_bad_relation_and_columns() {
        let err = expand_err(parse_quote! {
            struct BadRelation {
                state: PersistState,
                #[orm(column = "owner_id", relation)]
                owner: Box<Owner>,
            }
        });
        assert!(err.contains("Option<Box<T>>"));

        let err = expand_err(parse_quote! {
            struct BadColumn {
                state: PersistState,
                #[orm(column = "a b")]
                a: i64,
            }
        });
        assert!(err.contains("not a valid SQL identifier"));

        let err = expand_err(parse_quote! {
            struct Entity {
                state: PersistState,
            }
        });
        assert!(err.contains("derived table name"));
    }

    #[test]
    fn empty_column_is_not_persisted() {
        let input: DeriveInput = parse_quote! {
            struct Blank {
                state: PersistState,
                #[orm(column = "")]
                a: i64,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(!out.contains("FieldDescriptor :: scalar"));
    }
}
