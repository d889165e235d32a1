pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod telegram;
pub mod tron;

pub use config::{AppConfig, LoggingConfig, PollingConfig, TelegramConfig, ThresholdConfig, TronConfig};
pub use error::{NotifierError, Result};
pub use logging::{ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
pub use telegram::{Notifier, TelegramClient};
pub use tron::{TransactionMonitor, TransferClassifier, TransferProcessor, TronClient};
