use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProcessingError;

/// Contract type tag of a native TRX transfer
pub const TRANSFER_CONTRACT_TYPE: &str = "TransferContract";

/// Minor units per major unit. TRX (sun) and TRC-20 USDT both use 6 decimals.
pub const UNITS_PER_COIN: f64 = 1_000_000.0;

/// One page of `/v1/accounts/{address}/transactions`.
///
/// Entries stay raw so that one unusual transaction only fails at its own
/// position instead of rejecting the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Id of a raw page entry, if it carries one
pub fn transaction_id(raw: &Value) -> Option<&str> {
    raw.get("txID").and_then(Value::as_str)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TronTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: RawData,
    #[serde(rename = "trc20TransferInfo", default, skip_serializing_if = "Option::is_none")]
    pub trc20_transfer_info: Option<Vec<Trc20TransferInfo>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawData {
    #[serde(default)]
    pub contract: Vec<Contract>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    #[serde(rename = "type")]
    pub contract_type: String,
    #[serde(default)]
    pub parameter: ContractParameter,
}

/// Contract parameters vary per contract type, so the value is kept as JSON
/// and only decoded for the types we read
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractParameter {
    #[serde(default)]
    pub value: Value,
}

/// Parameters of a `TransferContract`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractValue {
    #[serde(default)]
    pub amount: RawAmount,
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub to_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Trc20TransferInfo {
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub amount: RawAmount,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Integer amount in minor units as the provider sent it.
///
/// TronGrid uses both JSON numbers and decimal strings, and tokens with 18
/// decimals routinely exceed `u64`. Parsing is deferred until the amount is
/// actually needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawAmount(Value);

impl RawAmount {
    /// Missing, null and blank amounts count as zero
    pub fn parse(&self) -> Result<u128, String> {
        match &self.0 {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_u64()
                .map(u128::from)
                .ok_or_else(|| format!("amount is not a non-negative integer: {}", n)),
            Value::String(s) if s.trim().is_empty() => Ok(0),
            Value::String(s) => s
                .trim()
                .parse::<u128>()
                .map_err(|e| format!("invalid amount '{}': {}", s, e)),
            other => Err(format!("unexpected amount type: {}", other)),
        }
    }
}

impl TronTransaction {
    /// Decode one raw page entry
    pub fn from_value(raw: &Value) -> Result<Self, ProcessingError> {
        Self::deserialize(raw).map_err(|e| ProcessingError::MalformedTransaction {
            txid: transaction_id(raw).unwrap_or("<unknown>").to_string(),
            reason: e.to_string(),
        })
    }

    /// The first contract entry, which decides the transaction's type
    pub fn primary_contract(&self) -> Option<&Contract> {
        self.raw_data.contract.first()
    }

    /// TRC-20 sub-records, empty when the provider sent none
    pub fn token_transfers(&self) -> &[Trc20TransferInfo] {
        self.trc20_transfer_info.as_deref().unwrap_or(&[])
    }
}

impl Contract {
    /// Decode the parameters as a native transfer
    pub fn transfer_value(&self) -> Result<ContractValue, serde_json::Error> {
        ContractValue::deserialize(&self.parameter.value)
    }
}

/// Which side of the transfer the monitored account is on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransferDirection {
    Incoming,
    Outgoing,
}

impl TransferDirection {
    pub fn from_recipient(recipient_is_monitored: bool) -> Self {
        if recipient_is_monitored {
            TransferDirection::Incoming
        } else {
            TransferDirection::Outgoing
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            TransferDirection::Incoming => "⬇️ IN",
            TransferDirection::Outgoing => "⬆️ OUT",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::Incoming => "incoming",
            TransferDirection::Outgoing => "outgoing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Asset {
    Trx,
    Token { symbol: String },
}

impl Asset {
    pub fn symbol(&self) -> &str {
        match self {
            Asset::Trx => "TRX",
            Asset::Token { symbol } => symbol,
        }
    }
}

/// A classified transfer ready for threshold filtering and formatting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferEvent {
    pub txid: String,
    pub asset: Asset,
    /// Amount in major units
    pub amount: f64,
    pub direction: TransferDirection,
}

/// Convert integer minor units to major units
pub fn scale_amount(raw: u128) -> f64 {
    raw as f64 / UNITS_PER_COIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_transfer_deserialization() {
        let tx = TronTransaction::from_value(&json!({
            "txID": "abc123",
            "raw_data": {
                "contract": [{
                    "type": "TransferContract",
                    "parameter": {
                        "value": {
                            "amount": 5_000_000,
                            "owner_address": "411111111111111111111111111111111111111111",
                            "to_address": "41ea51342dabbb928ae1e576bd39eff8aaf070a8c6"
                        },
                        "type_url": "type.googleapis.com/protocol.TransferContract"
                    }
                }]
            }
        }))
        .expect("Failed to deserialize");

        assert_eq!(tx.tx_id, "abc123");
        let contract = tx.primary_contract().expect("contract present");
        assert_eq!(contract.contract_type, TRANSFER_CONTRACT_TYPE);
        let value = contract.transfer_value().unwrap();
        assert_eq!(value.amount.parse(), Ok(5_000_000));
        assert_eq!(value.to_address, "41ea51342dabbb928ae1e576bd39eff8aaf070a8c6");
        assert!(tx.token_transfers().is_empty());
    }

    #[test]
    fn test_trc20_info_with_string_amount() {
        let tx = TronTransaction::from_value(&json!({
            "txID": "def456",
            "raw_data": {
                "contract": [{
                    "type": "TriggerSmartContract",
                    "parameter": { "value": { "data": "a9059cbb", "contract_address": "41a614f803b6fd780986a42c78ec9c7f77e6ded13c" } }
                }]
            },
            "trc20TransferInfo": [{
                "contract_address": "41a614f803b6fd780986a42c78ec9c7f77e6ded13c",
                "amount": "2500000",
                "from": "41ea51342dabbb928ae1e576bd39eff8aaf070a8c6",
                "to": "411111111111111111111111111111111111111111"
            }]
        }))
        .expect("Failed to deserialize");

        assert_eq!(tx.primary_contract().unwrap().contract_type, "TriggerSmartContract");

        let infos = tx.token_transfers();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].amount.parse(), Ok(2_500_000));
        assert_eq!(infos[0].to, "411111111111111111111111111111111111111111");
    }

    #[test]
    fn test_odd_contract_parameters_still_deserialize() {
        // non-transfer contracts can carry fields of any shape
        let tx = TronTransaction::from_value(&json!({
            "txID": "vote1",
            "raw_data": { "contract": [{
                "type": "VoteWitnessContract",
                "parameter": { "value": { "amount": "not-a-number", "votes": [{ "vote_count": 3 }] } }
            }]}
        }));
        assert!(tx.is_ok());
    }

    #[test]
    fn test_large_token_amount_is_kept_raw() {
        let info: Trc20TransferInfo = serde_json::from_value(json!({
            "contract_address": "41cccccccccccccccccccccccccccccccccccccccc",
            "amount": "100000000000000000000"
        }))
        .unwrap();
        assert_eq!(info.amount.parse(), Ok(100_000_000_000_000_000_000));
    }

    #[test]
    fn test_invalid_amount_fails_on_parse() {
        let info: Trc20TransferInfo = serde_json::from_value(json!({ "amount": "lots" })).unwrap();
        assert!(info.amount.parse().is_err());

        let value: ContractValue = serde_json::from_value(json!({ "amount": -5 })).unwrap();
        assert!(value.amount.parse().is_err());

        let value: ContractValue = serde_json::from_value(json!({ "amount": 1.5 })).unwrap();
        assert!(value.amount.parse().is_err());
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let info: Trc20TransferInfo = serde_json::from_value(json!({ "amount": null })).unwrap();
        assert_eq!(info.amount.parse(), Ok(0));
        let value: ContractValue = serde_json::from_value(json!({})).unwrap();
        assert_eq!(value.amount.parse(), Ok(0));
        let value: ContractValue = serde_json::from_value(json!({ "amount": " " })).unwrap();
        assert_eq!(value.amount.parse(), Ok(0));
    }

    #[test]
    fn test_page_without_data_is_empty() {
        let page: TransactionPage = serde_json::from_value(json!({ "success": true, "meta": {} })).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_page_keeps_broken_entries() {
        let page: TransactionPage = serde_json::from_value(json!({
            "data": [{ "txID": "abc" }, { "raw_data": {} }]
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(transaction_id(&page.data[0]), Some("abc"));
        assert_eq!(transaction_id(&page.data[1]), None);
    }

    #[test]
    fn test_missing_raw_data_is_malformed() {
        let result = TronTransaction::from_value(&json!({ "txID": "abc" }));
        assert!(matches!(result, Err(ProcessingError::MalformedTransaction { txid, .. }) if txid == "abc"));

        let result = TronTransaction::from_value(&json!({ "raw_data": { "contract": [] } }));
        assert!(matches!(result, Err(ProcessingError::MalformedTransaction { txid, .. }) if txid == "<unknown>"));
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(5_000_000), 5.0);
        assert_eq!(scale_amount(500_000), 0.5);
        assert_eq!(scale_amount(1), 0.000001);
        assert_eq!(format!("{:.2}", scale_amount(1_234_567)), "1.23");
    }

    #[test]
    fn test_direction_indicator() {
        assert_eq!(TransferDirection::from_recipient(true), TransferDirection::Incoming);
        assert_eq!(TransferDirection::from_recipient(false), TransferDirection::Outgoing);
        assert_eq!(TransferDirection::Incoming.indicator(), "⬇️ IN");
        assert_eq!(TransferDirection::Outgoing.indicator(), "⬆️ OUT");
    }

    #[test]
    fn test_asset_symbol() {
        assert_eq!(Asset::Trx.symbol(), "TRX");
        assert_eq!(Asset::Token { symbol: "USDT".to_string() }.symbol(), "USDT");
    }
}
