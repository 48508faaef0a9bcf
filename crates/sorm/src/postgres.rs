//! `tokio-postgres` integration: [`Executor`] for `Client` and `Transaction`, and
//! `ToSql` for [`Value`].

use crate::client::{ExecResult, Executor, Rows};
use crate::config::OrmConfig;
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::session::Session;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{IsNull, ToSql, Type};

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql(ty, out),
            Value::Int(n) => write_int(*n, ty, out),
            Value::UInt(n) => write_int(i64::try_from(*n)?, ty, out),
            Value::Float(f) if *ty == Type::FLOAT4 => (*f as f32).to_sql(ty, out),
            Value::Float(f) => f.to_sql(ty, out),
            Value::Text(s) => s.as_str().to_sql(ty, out),
            Value::Bytes(b) if *ty == Type::BYTEA => b.as_slice().to_sql(ty, out),
            Value::Bytes(b) => std::str::from_utf8(b)?.to_sql(ty, out),
            Value::Timestamp(ts) if *ty == Type::TIMESTAMP => ts.naive_utc().to_sql(ty, out),
            Value::Timestamp(ts) => ts.to_sql(ty, out),
            Value::Date(d) => d.to_sql(ty, out),
            Value::Uuid(u) => u.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn write_int(n: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(n)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(n)?.to_sql(ty, out),
        Type::OID => u32::try_from(n)?.to_sql(ty, out),
        Type::FLOAT4 => (n as f32).to_sql(ty, out),
        Type::FLOAT8 => (n as f64).to_sql(ty, out),
        Type::BOOL => (n != 0).to_sql(ty, out),
        _ => n.to_sql(ty, out),
    }
}

/// Convert one column of a row into a [`Value`] by its Postgres type.
///
/// Types without a [`Value`] counterpart decode as `Value::Null`, which leaves the
/// mapped field untouched.
fn column_value(row: &Row, index: usize) -> Result<Value, tokio_postgres::Error> {
    fn get<'a, T, F>(row: &'a Row, index: usize, f: F) -> Result<Value, tokio_postgres::Error>
    where
        T: tokio_postgres::types::FromSql<'a>,
        F: FnOnce(T) -> Value,
    {
        Ok(row.try_get::<_, Option<T>>(index)?.map_or(Value::Null, f))
    }

    let ty = row.columns()[index].type_();
    match *ty {
        Type::BOOL => get(row, index, Value::Bool),
        Type::INT2 => get(row, index, |n: i16| Value::Int(n.into())),
        Type::INT4 => get(row, index, |n: i32| Value::Int(n.into())),
        Type::INT8 => get(row, index, Value::Int),
        Type::OID => get(row, index, |n: u32| Value::UInt(n.into())),
        Type::FLOAT4 => get(row, index, |f: f32| Value::Float(f.into())),
        Type::FLOAT8 => get(row, index, Value::Float),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get(row, index, Value::Text)
        }
        Type::BYTEA => get(row, index, Value::Bytes),
        Type::TIMESTAMPTZ => get(row, index, |ts: DateTime<Utc>| Value::Timestamp(ts)),
        Type::TIMESTAMP => get(row, index, |ts: NaiveDateTime| Value::Timestamp(ts.and_utc())),
        Type::DATE => get(row, index, |d: NaiveDate| Value::Date(d)),
        Type::UUID => get(row, index, Value::Uuid),
        _ => {
            tracing::trace!(
                target: "sorm",
                column = row.columns()[index].name(),
                pg_type = %ty,
                "unsupported column type; decoded as NULL",
            );
            Ok(Value::Null)
        }
    }
}

fn into_rows(rows: Vec<Row>) -> OrmResult<Rows> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();
    let mut out = Rows {
        columns,
        rows: Vec::with_capacity(rows.len()),
    };
    for row in &rows {
        let values = (0..row.len())
            .map(|i| column_value(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        out.rows.push(values);
    }
    Ok(out)
}

fn as_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

macro_rules! impl_pg_executor {
    ($ty:ty) => {
        impl Executor for $ty {
            async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
                let rows = <$ty>::query(self, sql, &as_params(params)).await?;
                into_rows(rows)
            }

            async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
                let n = <$ty>::execute(self, sql, &as_params(params)).await?;
                Ok(ExecResult::new(n))
            }

            async fn execute_returning(
                &self,
                sql: &str,
                params: &[Value],
            ) -> OrmResult<ExecResult> {
                let rows = <$ty>::query(self, sql, &as_params(params)).await?;
                let mut result = ExecResult::new(rows.len() as u64);
                if let Some(row) = rows.first() {
                    if let Some(id) = column_value(row, 0)?.as_i64() {
                        result = result.with_last_insert_id(id);
                    }
                }
                Ok(result)
            }
        }
    };
}

impl_pg_executor!(tokio_postgres::Client);
impl_pg_executor!(tokio_postgres::Transaction<'_>);

impl<C: Executor> Session<C> {
    /// Create a session rendering Postgres SQL (`$n` placeholders, `RETURNING` keys).
    pub fn postgres(client: C) -> Self {
        Session::new(client).with_config(OrmConfig::new().with_dialect(Dialect::Postgres))
    }
}
