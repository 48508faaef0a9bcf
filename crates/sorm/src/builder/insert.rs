use super::{SqlWriter, Statement};
use crate::config::OrmConfig;
use crate::entity::Entity;
use crate::monitor::QueryType;

/// Build `INSERT INTO <table> (<c1>,<c2>,...) VALUES (?,?,...)`.
///
/// Every persisted field except the primary key is written. Returns `None` when the entity
/// has nothing to insert.
pub fn build_insert<T: Entity>(entity: &T, config: &OrmConfig) -> Option<Statement> {
    let desc = T::descriptor();
    let indices: Vec<usize> = (0..desc.fields.len())
        .filter(|&i| !desc.fields[i].primary)
        .collect();
    if indices.is_empty() {
        return None;
    }

    let mut w = SqlWriter::new(config.dialect);
    w.push("INSERT INTO ");
    w.push_name(desc.table);
    w.push(" (");
    for (n, &i) in indices.iter().enumerate() {
        if n > 0 {
            w.push(",");
        }
        w.push_name(desc.fields[i].column);
    }
    w.push(") VALUES (");
    for (n, &i) in indices.iter().enumerate() {
        if n > 0 {
            w.push(",");
        }
        w.push_param(entity.field_value(i));
    }
    w.push(")");

    let returning = match desc.primary_column() {
        Some(pk) if w.dialect().uses_returning() => {
            w.push(" RETURNING ");
            w.push_name(pk);
            true
        }
        _ => false,
    };

    let mut stmt = w.finish(QueryType::Insert);
    stmt.fields = indices.iter().map(|&i| desc.fields[i].name).collect();
    stmt.returns_key = returning;
    Some(stmt)
}
