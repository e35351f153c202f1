//! JSON-RPC ledger client.
//!
//! Targets a development node that manages the submitting accounts, so
//! `eth_sendTransaction` is the submission path and the node signs with its
//! own keys. Message signatures for the escrow's authorization branches never go
//! through here; those come from [`swaplab_signer`].

use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{CallRequest, LedgerClient, PendingTx, Receipt, TxRequest};
use crate::error::LedgerError;

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcReceipt {
    #[serde(rename = "transactionHash")]
    transaction_hash: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
    #[serde(rename = "contractAddress")]
    contract_address: Option<String>,
    #[serde(rename = "gasUsed")]
    gas_used: String,
    status: String,
}

pub struct HttpLedger {
    client: reqwest::Client,
    url: String,
    poll_interval: Duration,
}

impl HttpLedger {
    pub fn new(url: impl Into<String>) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            poll_interval: Duration::from_millis(1_000),
        })
    }

    /// How often `wait` re-polls for a receipt.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// One JSON-RPC exchange where a `null` result is meaningful.
    async fn rpc_opt<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Option<T>, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id: 1,
        };
        debug!(method, "ledger rpc");
        let response: RpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;
        if let Some(error) = response.error {
            return Err(LedgerError::Rpc(format!(
                "{method}: {} (code {})",
                error.message, error.code
            )));
        }
        Ok(response.result)
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, LedgerError> {
        self.rpc_opt(method, params).await?.ok_or_else(|| {
            LedgerError::MalformedResponse(format!("{method} returned an empty result"))
        })
    }
}

fn address_hex(address: Address) -> String {
    format!("0x{}", hex::encode(address))
}

fn data_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn quantity(value: u64) -> String {
    format!("0x{value:x}")
}

fn u256_quantity(value: U256) -> String {
    format!("0x{value:x}")
}

fn parse_quantity(text: &str) -> Result<u64, LedgerError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|_| LedgerError::MalformedResponse(format!("bad quantity {text:?}")))
}

fn parse_bytes(text: &str) -> Result<Vec<u8>, LedgerError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|_| LedgerError::MalformedResponse(format!("bad hex {text:?}")))
}

fn parse_hash(text: &str) -> Result<B256, LedgerError> {
    let bytes = parse_bytes(text)?;
    if bytes.len() != 32 {
        return Err(LedgerError::MalformedResponse(format!(
            "bad hash length in {text:?}"
        )));
    }
    Ok(B256::from_slice(&bytes))
}

fn parse_address(text: &str) -> Result<Address, LedgerError> {
    let bytes = parse_bytes(text)?;
    if bytes.len() != 20 {
        return Err(LedgerError::MalformedResponse(format!(
            "bad address length in {text:?}"
        )));
    }
    Ok(Address::from_slice(&bytes))
}

fn tx_object(tx: &TxRequest) -> Value {
    let mut object = serde_json::Map::new();
    object.insert("from".into(), json!(address_hex(tx.from)));
    if let Some(to) = tx.to {
        object.insert("to".into(), json!(address_hex(to)));
    }
    object.insert("value".into(), json!(u256_quantity(tx.value)));
    object.insert("data".into(), json!(data_hex(&tx.data)));
    if let Some(nonce) = tx.nonce {
        object.insert("nonce".into(), json!(quantity(nonce)));
    }
    if let Some(gas_limit) = tx.gas_limit {
        object.insert("gas".into(), json!(quantity(gas_limit)));
    }
    if let Some(gas_price) = tx.gas_price {
        object.insert("gasPrice".into(), json!(u256_quantity(gas_price)));
    }
    Value::Object(object)
}

#[async_trait]
impl LedgerClient for HttpLedger {
    async fn get_transaction_count(&self, address: Address) -> Result<u64, LedgerError> {
        let count: String = self
            .rpc(
                "eth_getTransactionCount",
                vec![json!(address_hex(address)), json!("pending")],
            )
            .await?;
        parse_quantity(&count)
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<PendingTx, LedgerError> {
        let hash: String = self
            .rpc("eth_sendTransaction", vec![tx_object(&tx)])
            .await?;
        Ok(PendingTx {
            hash: parse_hash(&hash)?,
        })
    }

    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, LedgerError> {
        let mut object = serde_json::Map::new();
        if let Some(from) = request.from {
            object.insert("from".into(), json!(address_hex(from)));
        }
        object.insert("to".into(), json!(address_hex(request.to)));
        object.insert("data".into(), json!(data_hex(&request.data)));

        let result: String = self
            .rpc("eth_call", vec![Value::Object(object), json!("latest")])
            .await?;
        parse_bytes(&result)
    }

    async fn wait(&self, pending: &PendingTx) -> Result<Receipt, LedgerError> {
        let hash_hex = format!("0x{}", hex::encode(pending.hash));
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc_opt("eth_getTransactionReceipt", vec![json!(hash_hex)])
                .await?;

            if let Some(receipt) = receipt {
                if parse_quantity(&receipt.status)? == 0 {
                    return Err(LedgerError::TransactionReverted { hash: pending.hash });
                }
                return Ok(Receipt {
                    transaction_hash: parse_hash(&receipt.transaction_hash)?,
                    block_number: parse_quantity(&receipt.block_number)?,
                    contract_address: receipt
                        .contract_address
                        .as_deref()
                        .map(parse_address)
                        .transpose()?,
                    gas_used: parse_quantity(&receipt.gas_used)?,
                });
            }

            // No receipt yet. If the pool no longer knows the transaction
            // either, it is gone for good.
            let known: Option<Value> = self
                .rpc_opt("eth_getTransactionByHash", vec![json!(hash_hex)])
                .await?;
            if known.is_none() {
                return Err(LedgerError::TransactionDropped { hash: pending.hash });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_use_minimal_hex() {
        assert_eq!(quantity(0), "0x0");
        assert_eq!(quantity(100_000), "0x186a0");
        assert_eq!(u256_quantity(U256::from(2_000_000_009u64)), "0x77359409");
        assert_eq!(parse_quantity("0x186a0").unwrap(), 100_000);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
    }

    #[test]
    fn parse_helpers_reject_malformed_input() {
        assert!(parse_quantity("0xzz").is_err());
        assert!(parse_hash("0x1234").is_err());
        assert!(parse_address("0x00").is_err());
        assert!(parse_bytes("0x0g").is_err());
    }

    #[test]
    fn tx_object_omits_unset_fields() {
        let tx = TxRequest::to(Address::repeat_byte(0x11), Address::repeat_byte(0x22));
        let object = tx_object(&tx);
        assert!(object.get("nonce").is_none());
        assert!(object.get("gas").is_none());
        assert!(object.get("gasPrice").is_none());
        assert_eq!(object["value"], "0x0");

        let tx = tx.nonce(7).gas_limit(100_000).gas_price(U256::from(9u64));
        let object = tx_object(&tx);
        assert_eq!(object["nonce"], "0x7");
        assert_eq!(object["gas"], "0x186a0");
        assert_eq!(object["gasPrice"], "0x9");
    }
}
