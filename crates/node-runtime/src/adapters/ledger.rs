//! # Health Ledger Adapter
//!
//! `HealthLedger` over JSON-RPC. Transactions go through the wallet bridge
//! (`eth_sendTransaction`, the wallet signs); receipts and reads go to the
//! chain endpoint.
//!
//! ## Confirmation
//!
//! `await_confirmation` polls `eth_getTransactionReceipt` until a receipt
//! appears. Transport errors while polling are logged and retried; the
//! caller owns the overall deadline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hs_01_ciphertext_encoder::EncryptedRecord;
use hs_04_analysis_orchestrator::{
    HealthLedger, LedgerConfirmation, LedgerError, StoredHealthRecord,
};
use serde_json::{json, Value};
use shared_types::{entities::strip_hex_prefix, Address, TxHash};
use tracing::{debug, info, warn};

use super::abi;
use super::rpc_client::{JsonRpcClient, RpcError};
use super::wallet_bridge::CODE_USER_REJECTED;

/// Ledger contract reached over JSON-RPC.
pub struct JsonRpcHealthLedger {
    wallet_rpc: Arc<JsonRpcClient>,
    chain_rpc: Arc<JsonRpcClient>,
    contract: Address,
    poll_interval: Duration,
}

impl JsonRpcHealthLedger {
    /// Create a ledger adapter for `contract`.
    pub fn new(
        wallet_rpc: Arc<JsonRpcClient>,
        chain_rpc: Arc<JsonRpcClient>,
        contract: Address,
        poll_interval: Duration,
    ) -> Self {
        Self {
            wallet_rpc,
            chain_rpc,
            contract,
            poll_interval,
        }
    }

    /// Contract address.
    pub fn contract(&self) -> Address {
        self.contract
    }
}

/// Only a provider error answer is a refusal. A timeout or an unreadable
/// reply leaves the broadcast outcome unknown.
fn submit_error(err: RpcError) -> LedgerError {
    match err.provider_code() {
        Some(CODE_USER_REJECTED) => LedgerError::Rejected("User rejected the transaction".into()),
        _ => match err {
            RpcError::Rpc { message, .. } => LedgerError::Rejected(message),
            RpcError::Connection(msg) => LedgerError::Transport(msg),
            RpcError::Http(e) => LedgerError::Unknown(e.to_string()),
            RpcError::Parse(msg) => LedgerError::Unknown(msg),
        },
    }
}

fn hex_data(s: &str) -> Result<Vec<u8>, LedgerError> {
    hex::decode(strip_hex_prefix(s)).map_err(|e| LedgerError::Decode(format!("bad hex data: {}", e)))
}

fn hex_u64(s: &str) -> Result<u64, LedgerError> {
    u64::from_str_radix(strip_hex_prefix(s), 16)
        .map_err(|_| LedgerError::Decode(format!("bad quantity: {}", s)))
}

/// Interpret a transaction receipt.
///
/// A `0x0` status is `Reverted`. `record_index` comes from the first
/// `MetricsSubmitted` log emitted by `contract`; a missing or undecodable
/// log leaves it `None`.
pub fn confirmation_from_receipt(
    tx_hash: TxHash,
    receipt: &Value,
    contract: &Address,
) -> Result<LedgerConfirmation, LedgerError> {
    let status = receipt.get("status").and_then(Value::as_str);
    if status.map(|s| hex_u64(s).unwrap_or(0)) == Some(0) {
        return Err(LedgerError::Reverted { tx_hash });
    }

    let block_number = receipt
        .get("blockNumber")
        .and_then(Value::as_str)
        .map(hex_u64)
        .transpose()?;

    let topic = format!("0x{}", hex::encode(abi::event_topic(abi::METRICS_SUBMITTED)));
    let record_index = receipt
        .get("logs")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|log| {
            log.get("address")
                .and_then(Value::as_str)
                .and_then(|a| a.parse::<Address>().ok())
                .as_ref()
                == Some(contract)
        })
        .find(|log| {
            log.get("topics")
                .and_then(|t| t.get(0))
                .and_then(Value::as_str)
                .is_some_and(|t0| t0.eq_ignore_ascii_case(&topic))
        })
        .and_then(|log| log.get("data").and_then(Value::as_str))
        .and_then(|data| hex_data(data).ok())
        .and_then(|data| abi::decode_metrics_submitted_index(&data).ok());

    Ok(LedgerConfirmation {
        tx_hash,
        block_number,
        record_index,
    })
}

#[async_trait]
impl HealthLedger for JsonRpcHealthLedger {
    async fn submit_health_metrics(
        &self,
        from: Address,
        record: &EncryptedRecord,
    ) -> Result<TxHash, LedgerError> {
        let data = abi::encode_submit_health_metrics(record);
        debug!(
            "[hs-node] submitHealthMetrics: {} bytes calldata to {}",
            data.len(),
            self.contract
        );
        let tx = json!({
            "from": from,
            "to": self.contract,
            "data": format!("0x{}", hex::encode(&data)),
        });

        let hash: TxHash = self
            .wallet_rpc
            .call("eth_sendTransaction", [tx])
            .await
            .map_err(submit_error)?;
        info!("[hs-node] Transaction broadcast: {}", hash);
        Ok(hash)
    }

    async fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> Result<LedgerConfirmation, LedgerError> {
        loop {
            match self
                .chain_rpc
                .call_optional::<_, Value>("eth_getTransactionReceipt", [tx_hash])
                .await
            {
                Ok(Some(receipt)) => {
                    return confirmation_from_receipt(tx_hash, &receipt, &self.contract)
                }
                Ok(None) => debug!("[hs-node] {} pending", tx_hash),
                Err(e) => warn!("[hs-node] Receipt poll for {} failed: {}", tx_hash, e),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn user_health_record(
        &self,
        account: Address,
        index: u64,
    ) -> Result<StoredHealthRecord, LedgerError> {
        let call = json!({
            "to": self.contract,
            "data": format!("0x{}", hex::encode(abi::encode_user_health_records(&account, index))),
        });

        let result: String = self
            .chain_rpc
            .call("eth_call", (call, "latest"))
            .await
            .map_err(|e| match e {
                RpcError::Rpc { message, .. } => {
                    LedgerError::NotFound(format!("{} #{}: {}", account, index, message))
                }
                RpcError::Parse(msg) => LedgerError::Decode(msg),
                other => LedgerError::Transport(other.to_string()),
            })?;

        let data = hex_data(&result)?;
        if data.is_empty() {
            return Err(LedgerError::NotFound(format!("{} #{}", account, index)));
        }
        abi::decode_user_health_record(&data).map_err(|e| LedgerError::Decode(e.to_string()))
    }
}
