use thiserror::Error;

/// Main error type for the TRON transfer notifier
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Network(#[from] NetworkError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Transport-level failures while talking to the transaction provider
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// The provider answered, but not with something usable
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Balance query failed: {0}")]
    Balance(String),
}

/// Transaction processing errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Malformed transaction {txid}: {reason}")]
    MalformedTransaction { txid: String, reason: String },

    #[error("Amount parsing failed: {0}")]
    AmountParsing(String),
}

/// Telegram delivery errors
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Stops the process
    Critical,
    /// Blocks notifications from going out
    High,
    /// Expected to clear up on its own
    Medium,
    Low,
}

impl NotifierError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            NotifierError::Config(_) => ErrorSeverity::Critical,
            NotifierError::Telegram(_) => ErrorSeverity::High,
            NotifierError::Processing(_) => ErrorSeverity::High,
            NotifierError::Network(_) => ErrorSeverity::Medium,
            NotifierError::Provider(ProviderError::Status { status, .. }) if *status >= 500 => {
                ErrorSeverity::Medium
            }
            NotifierError::Provider(ProviderError::Balance(_)) => ErrorSeverity::Medium,
            NotifierError::Provider(_) => ErrorSeverity::High,
        }
    }

    /// Network failures get their own notice class; everything else is a bot error
    pub fn is_network(&self) -> bool {
        matches!(self, NotifierError::Network(_))
    }

    /// Text of the notice sent to the chat when a poll cycle fails
    pub fn notice_text(&self) -> String {
        if self.is_network() {
            format!("⚠️ Network error: {}", self)
        } else {
            format!("⚠️ Bot error: {}", self)
        }
    }
}

impl NetworkError {
    /// Classify a reqwest failure from the transaction fetch
    pub fn from_reqwest(err: &reqwest::Error, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout { seconds: timeout_seconds }
        } else if err.is_connect() {
            NetworkError::Connection(err.to_string())
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}
