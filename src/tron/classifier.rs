use crate::error::ProcessingError;
use crate::models::{
    normalize_address, scale_amount, Asset, RawAmount, TransferDirection, TransferEvent,
    TronAddress, TronTransaction, TRANSFER_CONTRACT_TYPE,
};

/// Turns raw transactions into transfer events relative to the monitored account
#[derive(Debug, Clone)]
pub struct TransferClassifier {
    account: TronAddress,
    token_contract: String,
    token_symbol: String,
}

impl TransferClassifier {
    pub fn new(account: TronAddress, token_contract: &str, token_symbol: &str) -> Self {
        Self {
            account,
            token_contract: normalize_address(token_contract),
            token_symbol: token_symbol.to_string(),
        }
    }

    pub fn is_tracked_token(&self, contract_address: &str) -> bool {
        normalize_address(contract_address) == self.token_contract
    }

    /// Classify one transaction.
    ///
    /// The native and token checks are independent: a single transaction can
    /// yield a TRX event and any number of token events. Events come back in
    /// the order they should be announced.
    pub fn classify(&self, tx: &TronTransaction) -> Result<Vec<TransferEvent>, ProcessingError> {
        let contract = tx.primary_contract().ok_or_else(|| ProcessingError::MalformedTransaction {
            txid: tx.tx_id.clone(),
            reason: "empty contract list".to_string(),
        })?;

        let mut events = Vec::new();

        if contract.contract_type == TRANSFER_CONTRACT_TYPE {
            let value = contract
                .transfer_value()
                .map_err(|e| ProcessingError::MalformedTransaction {
                    txid: tx.tx_id.clone(),
                    reason: format!("transfer parameters: {}", e),
                })?;
            events.push(TransferEvent {
                txid: tx.tx_id.clone(),
                asset: Asset::Trx,
                amount: scale_amount(parse_amount(&tx.tx_id, &value.amount)?),
                direction: TransferDirection::from_recipient(self.account.matches(&value.to_address)),
            });
        }

        // amounts of untracked tokens are never parsed
        for info in tx.token_transfers() {
            if !self.is_tracked_token(&info.contract_address) {
                continue;
            }
            events.push(TransferEvent {
                txid: tx.tx_id.clone(),
                asset: Asset::Token { symbol: self.token_symbol.clone() },
                amount: scale_amount(parse_amount(&tx.tx_id, &info.amount)?),
                direction: TransferDirection::from_recipient(self.account.matches(&info.to)),
            });
        }

        Ok(events)
    }
}

fn parse_amount(txid: &str, amount: &RawAmount) -> Result<u128, ProcessingError> {
    amount
        .parse()
        .map_err(|reason| ProcessingError::AmountParsing(format!("{}: {}", txid, reason)))
}
