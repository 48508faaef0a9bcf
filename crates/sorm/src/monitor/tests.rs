use super::*;
use crate::client::{Executor, Rows};
use crate::error::OrmError;
use crate::mock::MockExecutor;
use crate::value::Value;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_query_type_detection() {
    assert_eq!(QueryType::from_sql("SELECT * FROM test"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  select * FROM test"), QueryType::Select);
    assert_eq!(
        QueryType::from_sql("INSERT INTO test (name) VALUES (?)"),
        QueryType::Insert
    );
    assert_eq!(
        QueryType::from_sql("UPDATE test SET name = ? WHERE test_id = ?"),
        QueryType::Update
    );
    assert_eq!(
        QueryType::from_sql("DELETE FROM test WHERE test_id = $1"),
        QueryType::Delete
    );
    assert_eq!(QueryType::from_sql("CREATE TABLE test (id INT)"), QueryType::Other);
    assert_eq!(QueryType::from_sql(""), QueryType::Other);
}

#[test]
fn test_logging_monitor_truncation() {
    let monitor = LoggingMonitor::new().max_sql_length(10);
    assert_eq!(monitor.truncate_sql("SELECT * FROM test"), "SELECT * F...");
    assert_eq!(monitor.truncate_sql("SELECT 1"), "SELECT 1");
    assert_eq!(
        LoggingMonitor::new().no_truncate().truncate_sql(&"x".repeat(500)).len(),
        500
    );
}

#[test]
fn test_truncation_respects_char_boundaries() {
    assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    assert_eq!(truncate_sql_bytes("abc", 10), "abc");
}

#[test]
fn test_error_result_is_truncated() {
    let result = QueryResult::error("e".repeat(2000));
    let QueryResult::Error(msg) = &result else {
        panic!("expected error");
    };
    assert_eq!(msg.len(), 512 + 3);
    assert!(result.is_error());
    assert_eq!(QueryResult::Affected(2).to_string(), "2 affected");
}

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    slow: AtomicUsize,
    kinds: Mutex<Vec<QueryType>>,
}

impl Counting {
    fn kinds(&self) -> Vec<QueryType> {
        self.kinds.lock().unwrap().clone()
    }
}

impl QueryMonitor for Counting {
    fn on_query_start(&self, _ctx: &QueryContext) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_query_complete(&self, ctx: &QueryContext, _d: Duration, result: &QueryResult) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        if result.is_error() {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.kinds.lock().unwrap().push(ctx.query_type);
    }

    fn on_slow_query(&self, _ctx: &QueryContext, _d: Duration) {
        self.slow.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_instrumented_reports_only_when_enabled() {
    let counting = Arc::new(Counting::default());
    let disabled =
        InstrumentedExecutor::new(MockExecutor::new()).with_monitor_arc(counting.clone());
    disabled.execute("DELETE FROM test", &[]).await.unwrap();
    assert_eq!(counting.completed.load(Ordering::SeqCst), 0);

    let enabled = InstrumentedExecutor::new(MockExecutor::new())
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(counting.clone());
    enabled
        .inner()
        .push_rows(Rows::new(["id"]).with_row([Value::Int(1)]));
    let rows = enabled.query("SELECT * FROM test", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    enabled
        .execute("INSERT INTO test (name) VALUES (?)", &[Value::from("Jake")])
        .await
        .unwrap();

    assert_eq!(counting.started.load(Ordering::SeqCst), 2);
    assert_eq!(counting.completed.load(Ordering::SeqCst), 2);
    assert_eq!(counting.kinds(), vec![QueryType::Select, QueryType::Insert]);
    assert_eq!(enabled.inner().statements().len(), 2);
}

#[tokio::test]
async fn test_instrumented_counts_failures() {
    let counting = Arc::new(Counting::default());
    let exec = InstrumentedExecutor::new(MockExecutor::new())
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(counting.clone());
    exec.inner().fail_next("connection reset");

    let err = exec.execute("UPDATE test SET a = ?", &[]).await.unwrap_err();
    assert!(err.is_query());
    assert_eq!(counting.failed.load(Ordering::SeqCst), 1);
    assert_eq!(counting.kinds(), vec![QueryType::Update]);
}

#[tokio::test]
async fn test_slow_query_callback() {
    let counting = Arc::new(Counting::default());
    let exec = InstrumentedExecutor::new(
        MockExecutor::new().with_delay(Duration::from_millis(20)),
    )
    .with_config(
        MonitorConfig::new()
            .with_slow_query_threshold(Duration::from_millis(1))
            .enable_monitoring(),
    )
    .with_monitor_arc(counting.clone());

    exec.query("SELECT * FROM test", &[]).await.unwrap();
    assert_eq!(counting.started.load(Ordering::SeqCst), 1);
    assert_eq!(counting.completed.load(Ordering::SeqCst), 1);
    assert_eq!(counting.slow.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_query_timeout() {
    let exec = InstrumentedExecutor::new(
        MockExecutor::new().with_delay(Duration::from_millis(200)),
    )
    .with_config(MonitorConfig::new().with_query_timeout(Duration::from_millis(10)));

    let err = exec.query("SELECT * FROM test", &[]).await.unwrap_err();
    assert!(matches!(err, OrmError::Timeout(d) if d == Duration::from_millis(10)));
    assert!(err.is_timeout());
}
