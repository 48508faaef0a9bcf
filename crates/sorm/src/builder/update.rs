use super::{SqlWriter, Statement};
use crate::config::OrmConfig;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::monitor::QueryType;
use crate::primary::primary_value;
use crate::state::changed_indices;

/// Build `UPDATE <table> SET <c1> = ?, ... WHERE <primary> = ?` for the changed fields.
///
/// Returns `Ok(None)` when no field differs from the snapshot. Fails with
/// [`OrmError::MissingSnapshot`] when the entity was never loaded or saved.
pub fn build_update<T: Entity>(entity: &T, config: &OrmConfig) -> OrmResult<Option<Statement>> {
    let desc = T::descriptor();
    let pk = desc
        .primary()
        .ok_or(OrmError::InvalidPrimary(desc.type_name))?;

    let changed = changed_indices(entity)?;
    if changed.is_empty() {
        return Ok(None);
    }

    let mut w = SqlWriter::new(config.dialect);
    w.push("UPDATE ");
    w.push_name(desc.table);
    w.push(" SET ");
    for (n, &i) in changed.iter().enumerate() {
        if n > 0 {
            w.push(", ");
        }
        w.push_name(desc.fields[i].column);
        w.push(" = ");
        w.push_param(entity.field_value(i));
    }
    w.push(" WHERE ");
    w.push_name(pk.column);
    w.push(" = ");

    let key = primary_value(entity);
    match key.integer_literal() {
        Some(literal) if config.inline_update_key => w.push(&literal),
        _ => w.push_param(key),
    }

    let mut stmt = w.finish(QueryType::Update);
    stmt.fields = changed.iter().map(|&i| desc.fields[i].name).collect();
    Ok(Some(stmt))
}
