//! Structured, leveled logging consumed by the emitter.
//!
//! The emitter never talks to `tracing` directly. It logs through a
//! [`Logger`], which may also be absent altogether. [`TracingLogger`] is the
//! usual choice; [`MemoryLogger`] records lines for assertions in tests.

use crate::{Data, Value};
use parking_lot::Mutex;
use tracing::Level;

/// Key/value context attached to a log line.
pub type Fields = Data;

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, fields: &Fields);
}

/// Convenience methods available on every [`Logger`], including `dyn Logger`.
pub trait LoggerExt: Logger {
    /// Returns a logger that adds `fields` to every line it writes.
    fn with_fields(&self, fields: Fields) -> Contextual<'_, Self> {
        Contextual {
            logger: self,
            fields,
        }
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message, &Fields::new());
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message, &Fields::new());
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message, &Fields::new());
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message, &Fields::new());
    }
}

impl<L: Logger + ?Sized> LoggerExt for L {}

/// A logger with fields attached, see [`LoggerExt::with_fields`].
///
/// Fields passed to an individual `log` call win over the attached ones.
pub struct Contextual<'a, L: ?Sized> {
    logger: &'a L,
    fields: Fields,
}

impl<L: Logger + ?Sized> Logger for Contextual<'_, L> {
    fn log(&self, level: Level, message: &str, fields: &Fields) {
        if fields.is_empty() {
            return self.logger.log(level, message, &self.fields);
        }

        let mut merged = self.fields.clone();
        merged.extend(fields.clone());
        self.logger.log(level, message, &merged);
    }
}

/// Forwards log lines to `tracing`, tagged with a source name.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    source: String,
}

impl TracingLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("events")
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str, fields: &Fields) {
        let source = self.source.as_str();
        match level {
            Level::ERROR => tracing::error!(source, fields = %fields, "{message}"),
            Level::WARN => tracing::warn!(source, fields = %fields, "{message}"),
            Level::INFO => tracing::info!(source, fields = %fields, "{message}"),
            Level::DEBUG => tracing::debug!(source, fields = %fields, "{message}"),
            _ => tracing::trace!(source, fields = %fields, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    pub fn field(&self, key: &str) -> &Value {
        &self.fields[key]
    }
}

/// In-memory logger for tests. Thread-safe.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn records_at(&self, level: Level) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str, fields: &Fields) {
        self.records.lock().push(LogRecord {
            level,
            message: message.to_owned(),
            fields: fields.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use std::sync::Arc;

    #[test]
    fn records_level_message_and_fields() {
        let logger = MemoryLogger::new();
        logger.with_fields(data! { "event" => "login" }).warn("careful");
        logger.info("plain");

        let records = logger.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::WARN);
        assert_eq!(records[0].message, "careful");
        assert_eq!(records[0].field("event").as_str(), Some("login"));
        assert!(records[1].fields.is_empty());
    }

    #[test]
    fn contextual_fields_merge_and_chain() {
        let logger = MemoryLogger::new();
        let scoped = logger.with_fields(data! { "event" => "x", "data" => 1 });
        scoped
            .with_fields(data! { "data" => 2, "error" => "boom" })
            .error("failed");

        let record = &logger.records_at(Level::ERROR)[0];
        assert_eq!(record.field("event").as_str(), Some("x"));
        assert_eq!(record.field("data").as_i64(), Some(2));
        assert_eq!(record.field("error").as_str(), Some("boom"));
    }

    #[test]
    fn works_through_a_trait_object() {
        let memory = Arc::new(MemoryLogger::new());
        let logger: Arc<dyn Logger> = memory.clone();
        logger.with_fields(data! { "k" => true }).debug("hello");

        assert_eq!(memory.records_at(Level::DEBUG).len(), 1);
        assert!(memory.records_at(Level::INFO).is_empty());
    }

    #[test]
    fn tracing_logger_defaults_its_source() {
        let logger = TracingLogger::default();
        assert_eq!(logger.source(), "events");
        // no subscriber installed; must not panic
        logger.with_fields(data! { "event" => "x" }).error("dropped");
    }
}
