use super::{SqlWriter, Statement};
use crate::config::OrmConfig;
use crate::entity::EntityDescriptor;
use crate::error::OrmResult;
use crate::ident::Ident;
use crate::monitor::QueryType;
use crate::value::Value;

/// Build `SELECT * FROM <table> WHERE <column> = ?`.
///
/// `column` comes from the caller and must parse as an SQL identifier.
pub fn build_select(
    desc: &EntityDescriptor,
    column: &str,
    value: Value,
    config: &OrmConfig,
) -> OrmResult<Statement> {
    let column = Ident::parse(column)?;

    let mut w = SqlWriter::new(config.dialect);
    w.push("SELECT * FROM ");
    w.push_name(desc.table);
    w.push(" WHERE ");
    column.write_sql(config.dialect, w.sql_mut());
    w.push(" = ");
    w.push_param(value);
    Ok(w.finish(QueryType::Select))
}
