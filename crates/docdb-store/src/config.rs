use std::fmt;
use std::sync::Arc;

use crate::logger::{ConsoleLogger, LogLevel, Logger};

/// Options accepted by [`Driver::open`](crate::Driver::open).
#[derive(Clone, Default)]
pub struct StoreConfig {
    /// Logger for lifecycle and debug notices. When `None`, a
    /// [`ConsoleLogger`] at `log_level` is used.
    pub logger: Option<Arc<dyn Logger>>,
    /// Minimum level for the default console logger.
    pub log_level: LogLevel,
}

impl StoreConfig {
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// The supplied logger, or the default console logger.
    pub(crate) fn resolve_logger(&self) -> Arc<dyn Logger> {
        match &self.logger {
            Some(logger) => Arc::clone(logger),
            None => Arc::new(ConsoleLogger::new(self.log_level)),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("logger", &self.logger.as_ref().map(|_| "<custom>"))
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NoopLogger;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert!(c.logger.is_none());
        assert_eq!(c.log_level, LogLevel::Info);
    }

    #[test]
    fn builder_sets_fields() {
        let c = StoreConfig::default()
            .with_logger(Arc::new(NoopLogger))
            .with_log_level(LogLevel::Trace);
        assert!(c.logger.is_some());
        assert_eq!(c.log_level, LogLevel::Trace);
        assert!(format!("{c:?}").contains("<custom>"));
    }

    #[test]
    fn resolve_prefers_supplied_logger() {
        let supplied: Arc<dyn Logger> = Arc::new(NoopLogger);
        let c = StoreConfig::default().with_logger(Arc::clone(&supplied));
        assert!(Arc::ptr_eq(&c.resolve_logger(), &supplied));
    }
}
