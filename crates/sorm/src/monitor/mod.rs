//! Statement timing for executors.
//!
//! [`InstrumentedExecutor`] wraps any [`Executor`](crate::Executor), reports each statement
//! to a [`QueryMonitor`] and can abandon statements that exceed a timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use sorm::monitor::{InstrumentedExecutor, LoggingMonitor, MonitorConfig};
//! use sorm::Session;
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_query_timeout(Duration::from_secs(30))
//!     .with_slow_query_threshold(Duration::from_millis(200))
//!     .enable_monitoring();
//!
//! let executor = InstrumentedExecutor::new(executor)
//!     .with_config(config)
//!     .with_monitor(LoggingMonitor::new());
//! let session = Session::new(executor);
//! ```

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedExecutor;
pub use monitors::{LoggingMonitor, NoopMonitor};
pub use types::{QueryContext, QueryMonitor, QueryResult, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
