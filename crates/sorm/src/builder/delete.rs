use super::{SqlWriter, Statement};
use crate::config::OrmConfig;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::monitor::QueryType;
use crate::primary::primary_value;

/// Build `DELETE FROM <table> WHERE <primary> = ?`.
pub fn build_delete<T: Entity>(entity: &T, config: &OrmConfig) -> OrmResult<Statement> {
    let desc = T::descriptor();
    let pk = desc
        .primary_column()
        .ok_or(OrmError::InvalidPrimary(desc.type_name))?;

    let mut w = SqlWriter::new(config.dialect);
    w.push("DELETE FROM ");
    w.push_name(desc.table);
    w.push(" WHERE ");
    w.push_name(pk);
    w.push(" = ");
    w.push_param(primary_value(entity));
    Ok(w.finish(QueryType::Delete))
}
