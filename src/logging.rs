use log::{info, warn, error, debug};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ErrorSeverity, NotifierError};
use crate::models::TransferEvent;

/// Structured logging context for the notifier
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_txid(self, txid: &str) -> Self {
        self.with_metadata("txid", json!(txid))
    }

    pub fn with_address(self, address: &str) -> Self {
        self.with_metadata("address", json!(address))
    }

    pub fn with_amount(self, amount: f64) -> Self {
        self.with_metadata("amount", json!(amount))
    }

    pub fn with_direction(self, direction: &str) -> Self {
        self.with_metadata("direction", json!(direction))
    }

    pub fn with_duration_ms(self, duration_ms: u64) -> Self {
        self.with_metadata("duration_ms", json!(duration_ms))
    }

    /// Attach txid, asset, amount and direction of a transfer
    pub fn with_transfer(self, event: &TransferEvent) -> Self {
        self.with_txid(&event.txid)
            .with_metadata("asset", json!(event.asset.symbol()))
            .with_amount(event.amount)
            .with_direction(event.direction.as_str())
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }
}

/// Times a single operation and logs the outcome
pub struct PerformanceMonitor {
    pub start_time: SystemTime,
    operation: String,
    metadata: HashMap<String, Value>,
}

impl PerformanceMonitor {
    pub fn new(operation: &str) -> Self {
        Self {
            start_time: SystemTime::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    fn elapsed_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or_default()
            .as_millis() as u64
    }

    pub fn finish_with_result<T, E>(self, result: &Result<T, E>) -> u64
    where
        E: std::fmt::Display,
    {
        let duration = self.elapsed_ms();

        let mut context = LogContext::new("performance", &self.operation)
            .with_duration_ms(duration);

        for (key, value) in self.metadata {
            context = context.with_metadata(&key, value);
        }

        match result {
            Ok(_) => {
                context.debug(&format!("Operation completed successfully in {}ms", duration));
            }
            Err(e) => {
                context = context.with_metadata("error", json!(e.to_string()));
                context.warn(&format!("Operation failed after {}ms: {}", duration, e));
            }
        }

        duration
    }
}

/// Error logging utilities
pub struct ErrorLogger;

impl ErrorLogger {
    pub fn log_error(error: &NotifierError, context: Option<LogContext>) {
        let severity = error.severity();

        let log_context = context
            .unwrap_or_else(|| LogContext::new("error", "unknown"))
            .with_metadata("error_type", json!(format!("{:?}", error)))
            .with_metadata("severity", json!(format!("{:?}", severity)))
            .with_metadata("network", json!(error.is_network()));

        let message = format!("Error occurred: {}", error);

        match severity {
            ErrorSeverity::Critical | ErrorSeverity::High => log_context.error(&message),
            ErrorSeverity::Medium => log_context.warn(&message),
            ErrorSeverity::Low => log_context.info(&message),
        }
    }
}

/// Application metrics, emitted as structured log lines
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_poll_cycle(fetched: usize, new: usize, notified: usize, seen_total: usize) {
        let context = LogContext::new("metrics", "poll_cycle")
            .with_metadata("fetched", json!(fetched))
            .with_metadata("new", json!(new))
            .with_metadata("notified", json!(notified))
            .with_metadata("seen_total", json!(seen_total));

        if new > 0 {
            context.info(&format!("Poll cycle: {} fetched, {} new, {} notified", fetched, new, notified));
        } else {
            context.debug(&format!("Poll cycle: {} fetched, nothing new", fetched));
        }
    }

    pub fn log_api_call(endpoint: &str, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "api_call")
            .with_metadata("endpoint", json!(endpoint))
            .with_duration_ms(duration_ms)
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!("API call {} completed in {}ms", endpoint, duration_ms));
        } else {
            context.warn(&format!("API call {} failed after {}ms", endpoint, duration_ms));
        }
    }

    pub fn log_notification_sent(event: &TransferEvent) {
        LogContext::new("metrics", "notification_sent")
            .with_transfer(event)
            .info(&format!(
                "Notified {} {:.2} {}",
                event.direction.as_str(),
                event.amount,
                event.asset.symbol()
            ));
    }

    pub fn log_notification_suppressed(event: &TransferEvent, minimum: f64) {
        LogContext::new("metrics", "notification_suppressed")
            .with_transfer(event)
            .with_metadata("minimum", json!(minimum))
            .debug(&format!(
                "Below threshold: {:.6} {} < {}",
                event.amount,
                event.asset.symbol(),
                minimum
            ));
    }
}

/// Initialize structured logging for the application
pub fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            // Structured entries are JSON; pretty-print those
            if let Ok(json_value) = serde_json::from_str::<Value>(record.args().to_string().as_str()) {
                writeln!(buf, "{}", serde_json::to_string_pretty(&json_value)?)
            } else {
                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            }
        })
        .init();

    info!("Structured logging initialized");
}
