use std::time::Duration;

/// Timeout and slow-statement settings for an
/// [`InstrumentedExecutor`](super::InstrumentedExecutor).
///
/// Monitors are only called once `monitoring_enabled` is set. The timeout applies either way.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub query_timeout: Option<Duration>,
    pub slow_query_threshold: Option<Duration>,
    pub monitoring_enabled: bool,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon statements running longer than `timeout` with [`OrmError::Timeout`].
    ///
    /// [`OrmError::Timeout`]: crate::OrmError::Timeout
    pub fn with_query_timeout(self, timeout: Duration) -> Self {
        Self {
            query_timeout: Some(timeout),
            ..self
        }
    }

    pub fn with_slow_query_threshold(self, threshold: Duration) -> Self {
        Self {
            slow_query_threshold: Some(threshold),
            ..self
        }
    }

    pub fn enable_monitoring(self) -> Self {
        Self {
            monitoring_enabled: true,
            ..self
        }
    }

    pub fn disable_monitoring(self) -> Self {
        Self {
            monitoring_enabled: false,
            ..self
        }
    }
}
