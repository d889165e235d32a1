use serde_json::Value;

use crate::error::{NotifierError, ProcessingError};
use crate::logging::LogContext;
use crate::models::{transaction_id, SeenTransactions, TronTransaction};
use crate::telegram::Notifier;
use crate::tron::TransferClassifier;

/// Dedup, classify and notify for a single transaction
#[derive(Clone)]
pub struct TransferProcessor {
    classifier: TransferClassifier,
    notifier: Notifier,
}

impl TransferProcessor {
    pub fn new(classifier: TransferClassifier, notifier: Notifier) -> Self {
        Self { classifier, notifier }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Process one raw page entry against the `seen` set and return how
    /// many notifications went out.
    ///
    /// Already seen ids are skipped outright, before the entry is decoded.
    /// Otherwise the id is recorded after every event has been handled,
    /// including events suppressed by a threshold. If decoding or a delivery
    /// fails the error is returned before the id is recorded, so the next
    /// poll picks the transaction up again.
    pub async fn handle_transaction(
        &self,
        seen: &mut SeenTransactions,
        raw: &Value,
    ) -> Result<usize, NotifierError> {
        let txid = transaction_id(raw).ok_or_else(|| ProcessingError::MalformedTransaction {
            txid: "<unknown>".to_string(),
            reason: "missing txID".to_string(),
        })?;
        if seen.contains(txid) {
            return Ok(0);
        }

        let tx = TronTransaction::from_value(raw)?;
        let events = self.classifier.classify(&tx)?;

        LogContext::new("processor", "handle_transaction")
            .with_txid(&tx.tx_id)
            .with_metadata("event_count", serde_json::json!(events.len()))
            .debug("Processing new transaction");

        let mut notified = 0;
        for event in &events {
            if self.notifier.notify(event).await? {
                notified += 1;
            }
        }

        seen.insert(&tx.tx_id);
        Ok(notified)
    }
}
