use super::truncate_sql_bytes;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use std::time::Duration;
use tracing::Level;

/// Monitor that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _: &QueryContext, _: Duration, _: &QueryResult) {}
}

/// Writes one `tracing` event per statement under target `sorm.sql`.
///
/// Failed and slow statements are reported at `WARN` whatever `level` says.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    pub level: Level,
    /// Successful statements faster than this are not logged.
    pub min_duration: Option<Duration>,
    /// Byte limit for logged SQL; `None` logs it whole.
    pub max_sql_length: Option<usize>,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            min_duration: None,
            max_sql_length: Some(200),
        }
    }
}

impl LoggingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    pub fn min_duration(self, duration: Duration) -> Self {
        Self {
            min_duration: Some(duration),
            ..self
        }
    }

    pub fn max_sql_length(self, len: usize) -> Self {
        Self {
            max_sql_length: Some(len),
            ..self
        }
    }

    pub fn no_truncate(self) -> Self {
        Self {
            max_sql_length: None,
            ..self
        }
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        let Some(max) = self.max_sql_length.filter(|&max| sql.len() > max) else {
            return sql.to_string();
        };
        let mut out = truncate_sql_bytes(sql, max).to_string();
        out.push_str("...");
        out
    }

    fn skips(&self, duration: Duration, result: &QueryResult) -> bool {
        !result.is_error() && self.min_duration.is_some_and(|min| duration < min)
    }
}

/// `tracing` macros take the level as a constant, so pick the macro at runtime.
macro_rules! event_at {
    ($level:expr, $($rest:tt)*) => {
        if $level == Level::ERROR {
            tracing::error!($($rest)*)
        } else if $level == Level::WARN {
            tracing::warn!($($rest)*)
        } else if $level == Level::INFO {
            tracing::info!($($rest)*)
        } else if $level == Level::DEBUG {
            tracing::debug!($($rest)*)
        } else {
            tracing::trace!($($rest)*)
        }
    };
}

impl QueryMonitor for LoggingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if self.skips(duration, result) {
            return;
        }
        let level = if result.is_error() {
            Level::WARN
        } else {
            self.level
        };
        event_at!(
            level,
            target: "sorm.sql",
            kind = ?ctx.query_type,
            params = ctx.param_count,
            elapsed = ?duration,
            outcome = %result,
            sql = %self.truncate_sql(&ctx.sql),
        );
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        tracing::warn!(
            target: "sorm.sql",
            kind = ?ctx.query_type,
            elapsed = ?duration,
            sql = %self.truncate_sql(&ctx.sql),
            "slow statement",
        );
    }
}
