use std::time::Duration;
use log::{info, warn};
use tokio::time::sleep;

use crate::config::{AppConfig, PollingConfig};
use crate::error::{ConfigError, NotifierError};
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{transaction_id, SeenTransactions};
use crate::telegram::{Notifier, TelegramClient};
use crate::tron::{TransferClassifier, TransferProcessor, TronClient};

/// Outcome of one successful poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub fetched: usize,
    pub new: usize,
    pub notified: usize,
}

/// Owns the dedup state and drives fetch → notify → sleep forever
pub struct TransactionMonitor {
    tron: TronClient,
    processor: TransferProcessor,
    seen: SeenTransactions,
    pub config: PollingConfig,
}

impl TransactionMonitor {
    pub fn new(tron: TronClient, processor: TransferProcessor, config: PollingConfig) -> Self {
        Self {
            tron,
            processor,
            seen: SeenTransactions::new(),
            config,
        }
    }

    /// Wire up every component from a validated configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let address = config.monitored_address()?;
        let tron = TronClient::new(&config.tron, address.clone());
        let telegram = TelegramClient::new(&config.telegram);
        let notifier = Notifier::new(telegram, tron.clone(), config.thresholds.clone(), &config.tron.explorer_url);
        let classifier = TransferClassifier::new(address, &config.tron.token_contract, &config.tron.token_symbol);
        let processor = TransferProcessor::new(classifier, notifier);

        Ok(Self::new(tron, processor, config.polling.clone()))
    }

    pub fn seen(&self) -> &SeenTransactions {
        &self.seen
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_seconds)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.config.error_backoff_seconds)
    }

    /// Remember the current page without announcing it, so existing history
    /// is not replayed on launch. A failure here just means starting empty.
    pub async fn bootstrap(&mut self) -> usize {
        match self.tron.fetch_transactions().await {
            Ok(transactions) => {
                self.seen.extend(transactions.iter().filter_map(transaction_id));
                LogContext::new("monitor", "bootstrap")
                    .with_address(self.tron.address().as_base58())
                    .with_metadata("seeded", serde_json::json!(self.seen.len()))
                    .info(&format!("Seeded {} known transactions", self.seen.len()));
                transactions.len()
            }
            Err(e) => {
                warn!("Startup fetch failed, starting with empty history: {}", e);
                0
            }
        }
    }

    /// Fetch the latest page and handle every transaction not seen yet, in
    /// fetch order. A malformed entry fails the cycle at its own position, so
    /// everything ahead of it has already been announced.
    pub async fn poll_once(&mut self) -> Result<PollSummary, NotifierError> {
        let transactions = self.tron.fetch_transactions().await?;

        let mut summary = PollSummary {
            fetched: transactions.len(),
            ..PollSummary::default()
        };

        for raw in &transactions {
            if transaction_id(raw).is_some_and(|txid| self.seen.contains(txid)) {
                continue;
            }
            summary.new += 1;
            summary.notified += self.processor.handle_transaction(&mut self.seen, raw).await?;
        }

        MetricsLogger::log_poll_cycle(summary.fetched, summary.new, summary.notified, self.seen.len());
        Ok(summary)
    }

    /// One pass of the loop. Returns how long to sleep before the next one:
    /// the poll interval on success, the error backoff after reporting a
    /// failure to the chat.
    pub async fn run_cycle(&mut self) -> Duration {
        match self.poll_once().await {
            Ok(_) => self.poll_interval(),
            Err(e) => {
                ErrorLogger::log_error(&e, Some(LogContext::new("monitor", "poll")));
                self.processor.notifier().send_error_notice(&e).await;
                self.error_backoff()
            }
        }
    }

    /// Bootstrap, then poll until the task is dropped
    pub async fn run(&mut self) {
        info!(
            "Monitoring {} every {}s (backoff {}s)",
            self.tron.address(),
            self.config.poll_interval_seconds,
            self.config.error_backoff_seconds
        );

        self.bootstrap().await;

        loop {
            let pause = self.run_cycle().await;
            sleep(pause).await;
        }
    }
}
