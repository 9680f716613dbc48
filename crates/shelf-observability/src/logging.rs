//! Structured logging with request context.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use shelf_core::RequestId;

/// URLs are cut to this many characters before they are logged.
pub const MAX_LOGGED_URL: usize = 100;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    /// Component that emitted the entry (`catalog`, `assets`, `api`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(component) = &self.component {
            s.insert_str(0, &format!("{} ", component));
        }

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(text) => format!("{}={}", k, text),
                    other => format!("{}={}", k, other),
                })
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines (production/log aggregation).
    #[default]
    Json,
    /// Human-readable (development).
    Human,
}

impl LogFormat {
    /// `human`/`pretty` select the human format, anything else JSON.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "pretty" | "text" => Self::Human,
            _ => Self::Json,
        }
    }
}

/// Destination for emitted entries.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Write formatted lines to stderr (Spin captures this).
    #[default]
    Stderr,
    /// Keep entries in memory.
    Memory(Arc<Mutex<Vec<LogEntry>>>),
}

impl LogSink {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(Vec::new())))
    }
}

/// Structured logger with request context.
///
/// One logger is created per inbound request and handed by reference to
/// every component that runs on behalf of that request.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    component: Option<String>,
    route: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl StructuredLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            component: None,
            route: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: LogSink::Stderr,
        }
    }

    /// Logger that records into memory at every level.
    pub fn in_memory() -> Self {
        Self::new(RequestId::from_string("test"))
            .with_min_level(LogLevel::Trace)
            .with_sink(LogSink::memory())
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Same request context, different component name.
    ///
    /// Shares the sink, so in-memory entries from both loggers land together.
    pub fn for_component(&self, component: impl Into<String>) -> Self {
        self.clone().with_component(component)
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            component: self.component.clone(),
            route: self.route.clone(),
            fields,
            elapsed_us: Some(self.elapsed_us()),
        };

        match &self.sink {
            LogSink::Stderr => {
                let output = match self.format {
                    LogFormat::Json => entry.to_json(),
                    LogFormat::Human => entry.to_human(),
                };
                eprintln!("{}", output);
            }
            LogSink::Memory(entries) => {
                if let Ok(mut entries) = entries.lock() {
                    entries.push(entry);
                }
            }
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Elapsed time since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    /// Entries recorded by a memory sink. Empty for stderr.
    pub fn entries(&self) -> Vec<LogEntry> {
        match &self.sink {
            LogSink::Memory(entries) => entries.lock().map(|e| e.clone()).unwrap_or_default(),
            LogSink::Stderr => Vec::new(),
        }
    }

    /// Recorded entries at exactly `level`.
    pub fn entries_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add a URL field, truncated to [`MAX_LOGGED_URL`] characters.
    pub fn url(self, key: &str, url: &str) -> Self {
        self.field(key, truncate_url(url))
    }

    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: std::time::Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

/// Cut a URL to [`MAX_LOGGED_URL`] characters on a char boundary.
pub fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(MAX_LOGGED_URL) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_entries() {
        let logger = StructuredLogger::in_memory().with_component("catalog");
        logger
            .warn_builder("catalog fetch failed")
            .field("reason", "timeout")
            .field_u64("pages", 2)
            .emit();

        let entries = logger.entries_at(LogLevel::Warn);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].component.as_deref(), Some("catalog"));
        assert_eq!(entries[0].field("reason"), Some(&serde_json::json!("timeout")));
    }

    #[test]
    fn test_min_level_filters() {
        let logger = StructuredLogger::in_memory().with_min_level(LogLevel::Warn);
        logger.info("ignored");
        logger.error("kept");
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn test_for_component_shares_sink() {
        let api = StructuredLogger::in_memory().with_component("api");
        let assets = api.for_component("assets");
        assets.info("resolved");
        api.info("responded");

        let entries = api.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].component.as_deref(), Some("assets"));
    }

    #[test]
    fn test_human_format() {
        let mut fields = BTreeMap::new();
        fields.insert("status".to_string(), serde_json::json!(403));
        fields.insert("host".to_string(), serde_json::json!("s3.amazonaws.com"));
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "stale asset".to_string(),
            request_id: "r".to_string(),
            component: Some("assets".to_string()),
            route: None,
            fields,
            elapsed_us: None,
        };
        assert_eq!(
            entry.to_human(),
            "assets [WARN] stale asset | host=s3.amazonaws.com status=403"
        );
    }

    #[test]
    fn test_json_format_flattens_fields() {
        let logger = StructuredLogger::in_memory();
        logger.info_builder("ok").field_bool("refreshed", true).emit();
        let json: serde_json::Value =
            serde_json::from_str(&logger.entries()[0].to_json()).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["refreshed"], true);
        assert_eq!(json["request_id"], "test");
    }

    #[test]
    fn test_truncate_url() {
        let long = format!("https://example.com/{}", "a".repeat(200));
        let cut = truncate_url(&long);
        assert_eq!(cut.len(), MAX_LOGGED_URL + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_url("https://x.example"), "https://x.example");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("human"), LogFormat::Human);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("other"), LogFormat::Json);
    }
}
