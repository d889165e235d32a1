use crate::config::ThresholdConfig;
use crate::error::NotifierError;
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{Asset, TransferEvent};
use crate::telegram::client::{ParseMode, TelegramClient};
use crate::tron::TronClient;

/// Applies thresholds, formats and delivers transfer notifications
#[derive(Clone)]
pub struct Notifier {
    telegram: TelegramClient,
    tron: TronClient,
    thresholds: ThresholdConfig,
    explorer_url: String,
}

impl Notifier {
    pub fn new(telegram: TelegramClient, tron: TronClient, thresholds: ThresholdConfig, explorer_url: &str) -> Self {
        Self {
            telegram,
            tron,
            thresholds,
            explorer_url: explorer_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn explorer_link(&self, txid: &str) -> String {
        format!("{}/#/transaction/{}", self.explorer_url, txid)
    }

    fn minimum_for(&self, asset: &Asset) -> f64 {
        match asset {
            Asset::Trx => self.thresholds.min_trx,
            Asset::Token { .. } => self.thresholds.min_token,
        }
    }

    /// Deliver a notification for `event` unless it falls below its threshold.
    /// Returns whether a message was sent.
    pub async fn notify(&self, event: &TransferEvent) -> Result<bool, NotifierError> {
        let minimum = self.minimum_for(&event.asset);
        if event.amount < minimum {
            MetricsLogger::log_notification_suppressed(event, minimum);
            return Ok(false);
        }

        let text = match &event.asset {
            Asset::Trx => {
                // queried per notification, never cached
                let balance = self.tron.get_balance().await?;
                self.format_trx_message(event, balance)
            }
            Asset::Token { .. } => self.format_token_message(event),
        };

        self.telegram.send_message(&text, Some(ParseMode::Markdown)).await?;
        MetricsLogger::log_notification_sent(event);
        Ok(true)
    }

    pub fn format_trx_message(&self, event: &TransferEvent, balance: f64) -> String {
        format!(
            "{} *{:.2} TRX*\n{}\n💰 Balance: `{:.2} TRX`",
            event.direction.indicator(),
            event.amount,
            self.explorer_link(&event.txid),
            balance
        )
    }

    pub fn format_token_message(&self, event: &TransferEvent) -> String {
        format!(
            "{} *{:.2} {}*\n{}",
            event.direction.indicator(),
            event.amount,
            event.asset.symbol(),
            self.explorer_link(&event.txid)
        )
    }

    /// Report a failed poll cycle to the chat. Sent as plain text since error
    /// messages may contain markup characters. A delivery failure here is only
    /// logged.
    pub async fn send_error_notice(&self, error: &NotifierError) -> bool {
        match self.telegram.send_message(&error.notice_text(), None).await {
            Ok(()) => true,
            Err(e) => {
                ErrorLogger::log_error(
                    &NotifierError::Telegram(e),
                    Some(LogContext::new("notifier", "send_error_notice")),
                );
                false
            }
        }
    }
}
