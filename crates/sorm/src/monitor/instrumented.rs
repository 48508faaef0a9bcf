use super::config::MonitorConfig;
use super::monitors::NoopMonitor;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use crate::client::{ExecResult, Executor, Rows};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Wraps an [`Executor`], timing each statement and reporting it to a [`QueryMonitor`].
///
/// Monitors only hear about statements after `MonitorConfig::enable_monitoring()`.
pub struct InstrumentedExecutor<E> {
    inner: E,
    monitor: Arc<dyn QueryMonitor>,
    config: MonitorConfig,
}

impl<E: Executor> InstrumentedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            monitor: Arc::new(NoopMonitor),
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    /// Share a monitor the caller keeps a handle to.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    async fn run<T, F>(
        &self,
        sql: &str,
        params: &[Value],
        future: F,
        summarize: impl FnOnce(&T) -> QueryResult,
    ) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        let ctx = QueryContext::new(sql, params.len());
        let enabled = self.config.monitoring_enabled;
        if enabled {
            self.monitor.on_query_start(&ctx);
        }

        let start = Instant::now();
        let result = match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .unwrap_or(Err(OrmError::Timeout(limit))),
            None => future.await,
        };
        let elapsed = start.elapsed();

        if enabled {
            let outcome = match &result {
                Ok(value) => summarize(value),
                Err(OrmError::Timeout(limit)) => {
                    QueryResult::Error(format!("timeout after {limit:?}"))
                }
                Err(e) => QueryResult::error(e.to_string()),
            };
            self.monitor.on_query_complete(&ctx, elapsed, &outcome);
            if self
                .config
                .slow_query_threshold
                .is_some_and(|threshold| elapsed > threshold)
            {
                self.monitor.on_slow_query(&ctx, elapsed);
            }
        }
        result
    }
}

impl<E: Executor> Executor for InstrumentedExecutor<E> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        self.run(sql, params, self.inner.query(sql, params), |rows| {
            QueryResult::Rows(rows.len())
        })
        .await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.run(sql, params, self.inner.execute(sql, params), |r| {
            QueryResult::Affected(r.rows_affected)
        })
        .await
    }

    async fn execute_returning(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.run(
            sql,
            params,
            self.inner.execute_returning(sql, params),
            |r| QueryResult::Affected(r.rows_affected),
        )
        .await
    }
}
