use parking_lot::Mutex;
use tether_core::LoggerService;
use tracing::{error, info};

/// Forwards plugin log output to `tracing`.
///
/// Events land under the `tether::plugin` target inside whatever span is
/// current, so the `dispatch` and `install` spans attach the plugin name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl LoggerService for TracingLogger {
    fn log(&self, message: &str) {
        info!(target: "tether::plugin", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "tether::plugin", "{message}");
    }
}

/// Severity of a captured log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,
    Error,
}

/// A captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Captures plugin log output in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far, in order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages logged at `level`, in order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Drops all captured entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

impl LoggerService for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(LogLevel::Log, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_keeps_order_and_level() {
        let logger = MemoryLogger::new();
        logger.log("one");
        logger.error("two");
        logger.log("three");

        assert_eq!(logger.messages(LogLevel::Log), ["one", "three"]);
        assert_eq!(logger.messages(LogLevel::Error), ["two"]);
        assert_eq!(logger.entries().len(), 3);

        logger.clear();
        assert!(logger.entries().is_empty());
    }
}
