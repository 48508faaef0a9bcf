//! The executor trait: the only way sorm talks to a database.

use crate::error::OrmResult;
use crate::value::Value;

/// Rows returned by [`Executor::query`].
///
/// Values are raw: `NULL` is [`Value::Null`] and drivers may report text as
/// [`Value::Bytes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    /// Create an empty result with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row (builder style).
    pub fn with_row<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take the first row, paired with its column names.
    pub fn into_first(self) -> Option<Vec<(String, Value)>> {
        let row = self.rows.into_iter().next()?;
        Some(self.columns.into_iter().zip(row).collect())
    }
}

/// Result of [`Executor::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Identifier generated by the statement, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// A trait that abstracts over SQL drivers.
///
/// Implementations own connection handling, timeouts and cancellation; sorm only hands
/// them statement text with positional parameters.
pub trait Executor: Send + Sync {
    /// Run a query and return its rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Rows>> + Send;

    /// Execute a statement.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send;

    /// Execute an INSERT that ends in `RETURNING <key>`.
    ///
    /// The default implementation calls [`Executor::execute`]. Drivers without a
    /// last-insert-id (Postgres) override it to read the returned row instead.
    fn execute_returning(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send {
        self.execute(sql, params)
    }
}

impl<E: Executor> Executor for &E {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        (**self).query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        (**self).execute(sql, params).await
    }

    async fn execute_returning(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        (**self).execute_returning(sql, params).await
    }
}
