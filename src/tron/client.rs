use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::TronConfig;
use crate::error::{NetworkError, NotifierError, ProviderError};
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};
use crate::models::{TransactionPage, TronAddress, UNITS_PER_COIN};

/// Header TronGrid reads the API key from
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Transactions requested per poll. Only the newest page is ever read.
pub const PAGE_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
struct AccountPage {
    #[serde(default)]
    data: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    /// Balance in sun; absent for accounts that never held TRX
    #[serde(default)]
    balance: u64,
}

/// Read-only TronGrid client for a single monitored account
#[derive(Clone)]
pub struct TronClient {
    api_url: String,
    api_key: String,
    address: TronAddress,
    timeout_seconds: u64,
    /// Shared client for balance queries; unlike the transaction fetch these
    /// run without a timeout
    balance_client: Client,
}

impl TronClient {
    pub fn new(config: &TronConfig, address: TronAddress) -> Self {
        let context = LogContext::new("tron_client", "initialization")
            .with_address(address.as_base58())
            .with_metadata("endpoint", json!(config.api_url))
            .with_metadata("api_key_set", json!(!config.api_key.is_empty()));
        context.info("Initializing TronGrid client");

        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            address,
            timeout_seconds: config.request_timeout_seconds,
            balance_client: Client::new(),
        }
    }

    pub fn address(&self) -> &TronAddress {
        &self.address
    }

    pub fn transactions_url(&self) -> String {
        format!(
            "{}/v1/accounts/{}/transactions?limit={}",
            self.api_url,
            self.address.as_base58(),
            PAGE_LIMIT
        )
    }

    pub fn account_url(&self) -> String {
        format!("{}/v1/accounts/{}", self.api_url, self.address.as_base58())
    }

    /// Fetch the most recent page of transactions, newest first.
    ///
    /// Each call builds its own HTTP client bounded by the configured
    /// timeout, and drops it on return. Entries come back undecoded; see
    /// `TronTransaction::from_value`.
    pub async fn fetch_transactions(&self) -> Result<Vec<Value>, NotifierError> {
        let monitor = PerformanceMonitor::new("tron_fetch_transactions")
            .with_metadata("address", json!(self.address.as_base58()));

        let result = self.fetch_transactions_inner().await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_api_call("transactions", duration, result.is_ok());

        if let Ok(transactions) = &result {
            LogContext::new("tron_client", "fetch_transactions")
                .with_metadata("transaction_count", json!(transactions.len()))
                .debug(&format!("Retrieved {} transactions", transactions.len()));
        }

        result
    }

    async fn fetch_transactions_inner(&self) -> Result<Vec<Value>, NotifierError> {
        let session = Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .build()
            .map_err(|e| NetworkError::from_reqwest(&e, self.timeout_seconds))?;

        let mut request = session.get(self.transactions_url());
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(&e, self.timeout_seconds))?;
        let response = check_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::from_reqwest(&e, self.timeout_seconds))?;

        let page: TransactionPage = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("transactions: {}", e)))?;

        Ok(page.data)
    }

    /// Current balance in TRX, rounded to two decimals
    pub async fn get_balance(&self) -> Result<f64, NotifierError> {
        let monitor = PerformanceMonitor::new("tron_get_balance")
            .with_metadata("address", json!(self.address.as_base58()));

        let result = self.get_balance_inner().await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_api_call("account", duration, result.is_ok());

        result
    }

    async fn get_balance_inner(&self) -> Result<f64, NotifierError> {
        let mut request = self.balance_client.get(self.account_url());
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Balance(e.to_string()))?;
        let response = check_status(response).await?;

        let page: AccountPage = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("account: {}", e)))?;

        let sun = page.data.first().map(|account| account.balance).unwrap_or(0);
        Ok(round_to_cents(sun as f64 / UNITS_PER_COIN))
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: truncate(&body, 200),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        truncated.push('…');
    }
    truncated
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
