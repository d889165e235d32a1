#![allow(dead_code)]

use std::collections::HashMap;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tron_transfer_notifier::config::AppConfig;

pub const MONITORED: &str = "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj";
pub const MONITORED_HEX: &str = "41ea51342dabbb928ae1e576bd39eff8aaf070a8c6";
pub const OTHER_HEX: &str = "411111111111111111111111111111111111111111";
pub const USDT_HEX: &str = "41a614f803b6fd780986a42c78ec9c7f77e6ded13c";
pub const BOT_TOKEN: &str = "123:abc";
pub const CHAT_ID: &str = "-1001234";

pub fn transactions_path() -> String {
    format!("/v1/accounts/{}/transactions", MONITORED)
}

pub fn account_path() -> String {
    format!("/v1/accounts/{}", MONITORED)
}

pub fn send_message_path() -> String {
    format!("/bot{}/sendMessage", BOT_TOKEN)
}

/// Configuration pointing both external APIs at mock servers
pub fn config_for(tron: &MockServer, telegram: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.telegram.bot_token = BOT_TOKEN.to_string();
    config.telegram.chat_id = CHAT_ID.to_string();
    config.telegram.api_url = telegram.uri();
    config.tron.address = MONITORED.to_string();
    config.tron.api_url = tron.uri();
    config.tron.explorer_url = "https://tronscan.org".to_string();
    config.tron.request_timeout_seconds = 1;
    config
}

pub async fn mount_transactions(server: &MockServer, transactions: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(transactions_path()))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": transactions,
            "success": true,
            "meta": { "page_size": 20 }
        })))
        .mount(server)
        .await;
}

pub async fn mount_balance(server: &MockServer, sun: u64) {
    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "address": MONITORED_HEX, "balance": sun }],
            "success": true
        })))
        .mount(server)
        .await;
}

pub async fn mount_telegram_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 1 }
        })))
        .mount(server)
        .await;
}

/// Decoded form bodies of every sendMessage call, in order
pub async fn sent_messages(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path().ends_with("/sendMessage"))
        .map(|request| decode_form(&request.body))
        .collect()
}

/// Number of balance queries the provider saw
pub async fn balance_queries(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == account_path())
        .count()
}

fn decode_form(body: &[u8]) -> HashMap<String, String> {
    let query = String::from_utf8_lossy(body);
    let url = reqwest::Url::parse(&format!("http://form.local/?{}", query)).expect("form body");
    url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

pub fn native_tx(txid: &str, sun: u64, from: &str, to: &str) -> Value {
    json!({
        "txID": txid,
        "raw_data": {
            "contract": [{
                "type": "TransferContract",
                "parameter": {
                    "value": { "amount": sun, "owner_address": from, "to_address": to },
                    "type_url": "type.googleapis.com/protocol.TransferContract"
                }
            }],
            "timestamp": 1_700_000_000_000u64
        },
        "ret": [{ "contractRet": "SUCCESS" }]
    })
}

pub fn token_tx(txid: &str, contract: &str, amount: u64, from: &str, to: &str) -> Value {
    json!({
        "txID": txid,
        "raw_data": {
            "contract": [{
                "type": "TriggerSmartContract",
                "parameter": {
                    "value": { "owner_address": from, "contract_address": contract, "data": "a9059cbb" },
                    "type_url": "type.googleapis.com/protocol.TriggerSmartContract"
                }
            }]
        },
        "trc20TransferInfo": [{
            "contract_address": contract,
            "amount": amount.to_string(),
            "from": from,
            "to": to
        }]
    })
}
