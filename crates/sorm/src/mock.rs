//! An in-memory [`Executor`] that records statements and replays canned results.
//!
//! Useful for testing code built on sorm without a database:
//!
//! ```ignore
//! let mock = MockExecutor::new();
//! let session = Session::new(&mock);
//! session.save(&mut entity).await?;
//! assert_eq!(mock.sql_log(), vec!["INSERT INTO test (name) VALUES (?)"]);
//! ```

use crate::client::{ExecResult, Executor, Rows};
use crate::error::{OrmError, OrmResult};
use crate::monitor::QueryType;
use crate::value::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A statement seen by [`MockExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Default)]
struct MockState {
    statements: Vec<RecordedStatement>,
    queued: VecDeque<Rows>,
    tables: HashMap<String, Rows>,
    failures: VecDeque<String>,
    next_id: i64,
    delay: Option<Duration>,
}

/// Records every statement and answers from queued or per-table results.
///
/// Queries are answered from the queue first, then from rows registered for the table
/// named after `FROM`, and otherwise with no rows. INSERTs report an auto-incremented
/// `last_insert_id` starting at 1.
#[derive(Debug)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a result set for the next query.
    pub fn push_rows(&self, rows: Rows) -> &Self {
        self.lock().queued.push_back(rows);
        self
    }

    /// Answer every query against `table` with `rows` once the queue is empty.
    pub fn with_table(self, table: &str, rows: Rows) -> Self {
        self.lock().tables.insert(table.to_string(), rows);
        self
    }

    /// Make the next statement fail with [`OrmError::Query`].
    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.lock().failures.push_back(message.into());
        self
    }

    /// Set the id reported by the next INSERT.
    pub fn with_next_id(self, id: i64) -> Self {
        self.lock().next_id = id;
        self
    }

    /// Sleep before answering every statement.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.lock().statements.clone()
    }

    /// SQL text of every recorded statement, in order.
    pub fn sql_log(&self) -> Vec<String> {
        self.lock()
            .statements
            .iter()
            .map(|s| s.sql.clone())
            .collect()
    }

    pub fn last(&self) -> Option<RecordedStatement> {
        self.lock().statements.last().cloned()
    }

    /// Forget recorded statements.
    pub fn clear(&self) {
        self.lock().statements.clear();
    }

    /// Record a statement; returns the delay to apply and the injected failure, if any.
    fn record(&self, sql: &str, params: &[Value]) -> (Option<Duration>, Option<String>) {
        let mut state = self.lock();
        state.statements.push(RecordedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        (state.delay, state.failures.pop_front())
    }
}

fn from_table(sql: &str) -> Option<String> {
    let mut words = sql.split_whitespace();
    words.find(|w| w.eq_ignore_ascii_case("FROM"))?;
    words
        .next()
        .map(|t| t.trim_matches(|c| c == '`' || c == '"').to_string())
}

impl Executor for MockExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        let (delay, failure) = self.record(sql, params);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = failure {
            return Err(OrmError::Query(message));
        }

        let mut state = self.lock();
        if let Some(rows) = state.queued.pop_front() {
            return Ok(rows);
        }
        Ok(from_table(sql)
            .and_then(|table| state.tables.get(&table).cloned())
            .unwrap_or_default())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let (delay, failure) = self.record(sql, params);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = failure {
            return Err(OrmError::Query(message));
        }

        if QueryType::from_sql(sql) == QueryType::Insert {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            return Ok(ExecResult::new(1).with_last_insert_id(id));
        }
        Ok(ExecResult::new(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_then_table_then_empty() {
        let mock = MockExecutor::new().with_table(
            "test",
            Rows::new(["test_id"]).with_row([Value::Int(9)]),
        );
        mock.push_rows(Rows::new(["test_id"]).with_row([Value::Int(1)]));

        let first = mock.query("SELECT * FROM test WHERE test_id = ?", &[]).await.unwrap();
        assert_eq!(first.rows[0][0], Value::Int(1));
        let second = mock.query("SELECT * FROM `test` WHERE x = ?", &[]).await.unwrap();
        assert_eq!(second.rows[0][0], Value::Int(9));
        let other = mock.query("SELECT * FROM other", &[]).await.unwrap();
        assert!(other.is_empty());
        assert_eq!(mock.statements().len(), 3);
    }

    #[tokio::test]
    async fn inserts_get_increasing_ids() {
        let mock = MockExecutor::new().with_next_id(41);
        let a = mock.execute("INSERT INTO t (a) VALUES (?)", &[Value::Int(1)]).await.unwrap();
        let b = mock.execute("INSERT INTO t (a) VALUES (?)", &[Value::Int(2)]).await.unwrap();
        let c = mock.execute("UPDATE t SET a = ? WHERE id = ?", &[]).await.unwrap();
        assert_eq!(a.last_insert_id, Some(41));
        assert_eq!(b.last_insert_id, Some(42));
        assert_eq!(c.last_insert_id, None);
        assert_eq!(mock.last().unwrap().sql, "UPDATE t SET a = ? WHERE id = ?");
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let mock = MockExecutor::new();
        mock.fail_next("boom");
        let err = mock.execute("DELETE FROM t", &[]).await.unwrap_err();
        assert!(matches!(err, OrmError::Query(ref m) if m == "boom"));
        assert!(mock.execute("DELETE FROM t", &[]).await.is_ok());
        assert_eq!(mock.sql_log().len(), 2);
    }
}
