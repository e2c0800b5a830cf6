//! # JSON-RPC Adapters
//!
//! The wallet bridge, balance query and ledger adapter driven against a local
//! JSON-RPC endpoint, with and without the session and orchestrator on top.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use hs_01_ciphertext_encoder::{seal_record, RecordPlaintext};
    use hs_03_wallet_session::{
        SessionConfig, SessionMachine, SessionReader, SessionState, WalletError,
        WalletProvider, WalletSessionApi,
    };
    use hs_04_analysis_orchestrator::{HealthLedger, LedgerError};
    use node_runtime::adapters::abi;
    use node_runtime::adapters::{JsonRpcClient, JsonRpcHealthLedger, JsonRpcWallet, RpcBalanceQuery};
    use serde_json::{json, Value};
    use shared_types::{Address, ChainId, TxHash, Wei};

    use crate::integration::fake_rpc::{self, rpc_error};
    use crate::integration::fixtures::{TestKeyPair, USER};

    const CONTRACT: Address = Address([0xC0; 20]);
    const TX: TxHash = TxHash([0xAB; 32]);

    fn client(url: &str) -> Arc<JsonRpcClient> {
        Arc::new(JsonRpcClient::new(url, Duration::from_secs(5)).unwrap())
    }

    fn word(value: usize) -> Vec<u8> {
        let mut w = vec![0u8; 32];
        w[24..].copy_from_slice(&(value as u64).to_be_bytes());
        w
    }

    /// ABI `(bytes, bytes, bytes, bytes, address)`.
    fn record_tuple(fields: [&[u8]; 4], user: &Address) -> String {
        let mut head = Vec::new();
        let mut tail = Vec::new();
        for f in fields {
            head.extend(word(5 * 32 + tail.len()));
            tail.extend(word(f.len()));
            tail.extend_from_slice(f);
            tail.resize(tail.len() + (32 - f.len() % 32) % 32, 0);
        }
        head.extend_from_slice(&[0u8; 12]);
        head.extend_from_slice(user.as_bytes());
        head.extend(tail);
        format!("0x{}", hex::encode(head))
    }

    #[tokio::test]
    async fn test_wallet_bridge_calls() {
        let url = fake_rpc::spawn(|method, params| match method {
            "eth_requestAccounts" => Ok(json!([USER])),
            "eth_chainId" => Ok(json!("0xa5b5a")),
            "wallet_switchEthereumChain" => {
                assert_eq!(params[0]["chainId"], "0x1");
                Err(json!({
                    "code": -32603,
                    "message": "Unrecognized chain ID",
                    "data": {"originalError": {"code": 4902}}
                }))
            }
            "wallet_revokePermissions" => Err(rpc_error(-32601, "Method not found")),
            other => Err(rpc_error(-32601, other)),
        })
        .await;
        let wallet = JsonRpcWallet::new(client(&url));

        assert_eq!(wallet.request_accounts().await.unwrap(), vec![USER]);
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId::SHIELD_TESTNET);
        assert_eq!(
            wallet.switch_chain(ChainId(1)).await,
            Err(WalletError::UnrecognizedChain(ChainId(1)))
        );
        assert!(matches!(
            wallet.revoke_permissions().await,
            Err(WalletError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_user_rejection_over_the_wire() {
        let url = fake_rpc::spawn(|_, _| Err(rpc_error(4001, "User rejected the request."))).await;
        let wallet = JsonRpcWallet::new(client(&url));

        assert_eq!(
            wallet.request_accounts().await,
            Err(WalletError::UserRejected)
        );
    }

    #[tokio::test]
    async fn test_unreachable_wallet_is_unavailable() {
        // Nothing listens on port 9 (discard) on loopback.
        let wallet = JsonRpcWallet::new(client("http://127.0.0.1:9"));
        assert!(matches!(
            wallet.chain_id().await,
            Err(WalletError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_session_over_rpc_adds_chain_then_reads_balance() {
        let on_target = Arc::new(AtomicBool::new(false));
        let registered = Arc::new(AtomicBool::new(false));
        let (on_target_w, registered_w) = (Arc::clone(&on_target), Arc::clone(&registered));

        let wallet_url = fake_rpc::spawn(move |method, params| match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!([USER])),
            "eth_chainId" if on_target_w.load(Ordering::SeqCst) => Ok(json!("0xa5b5a")),
            "eth_chainId" => Ok(json!("0x1")),
            "wallet_switchEthereumChain" if !registered_w.load(Ordering::SeqCst) => {
                Err(rpc_error(4902, "Unrecognized chain ID"))
            }
            "wallet_switchEthereumChain" => {
                on_target_w.store(true, Ordering::SeqCst);
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                assert_eq!(params[0]["chainId"], "0xa5b5a");
                assert_eq!(params[0]["nativeCurrency"]["symbol"], "OWN");
                registered_w.store(true, Ordering::SeqCst);
                Ok(Value::Null)
            }
            other => Err(rpc_error(-32601, other)),
        })
        .await;
        let chain_url = fake_rpc::spawn(|method, params| match method {
            // 5 tokens
            "eth_getBalance" => {
                assert_eq!(params[1], "latest");
                Ok(json!("0x4563918244f40000"))
            }
            other => Err(rpc_error(-32601, other)),
        })
        .await;

        let session = SessionMachine::new(
            SessionConfig::for_testing(),
            Some(Arc::new(JsonRpcWallet::new(client(&wallet_url)))),
            Arc::new(RpcBalanceQuery::new(client(&chain_url))),
        );

        let connected = session.connect().await.unwrap();
        assert_eq!(connected.state, SessionState::ConnectedWrongNetwork);

        let ready = session.ensure_network().await.unwrap();

        assert_eq!(ready.state, SessionState::ConnectedReady);
        assert!(registered.load(Ordering::SeqCst));
        assert_eq!(session.snapshot().balance(), Wei::from_tokens(5));
    }

    #[tokio::test]
    async fn test_ledger_submit_and_confirm() {
        let keys = TestKeyPair::new();
        let record = seal_record(
            &keys.public,
            &RecordPlaintext {
                heart_rate: 72,
                blood_pressure: 118,
                oxygen_level: 98,
                risk_level: 1,
            },
        )
        .unwrap();
        let selector = format!("0x{}", hex::encode(abi::selector(abi::SUBMIT_HEALTH_METRICS)));

        let wallet_url = fake_rpc::spawn(move |method, params| match method {
            "eth_sendTransaction" => {
                let tx = &params[0];
                assert_eq!(tx["from"], json!(USER));
                assert_eq!(tx["to"], json!(CONTRACT));
                assert!(tx["data"].as_str().unwrap().starts_with(&selector));
                Ok(json!(TX))
            }
            other => Err(rpc_error(-32601, other)),
        })
        .await;

        let polls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&polls);
        let chain_url = fake_rpc::spawn(move |method, _| match method {
            "eth_getTransactionReceipt" => {
                if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                    return Ok(Value::Null);
                }
                let mut data = vec![0u8; 5 * 32];
                data[5 * 32 - 1] = 4;
                Ok(json!({
                    "status": "0x1",
                    "blockNumber": "0x10",
                    "logs": [{
                        "address": CONTRACT,
                        "topics": [format!("0x{}", hex::encode(abi::event_topic(abi::METRICS_SUBMITTED)))],
                        "data": format!("0x{}", hex::encode(data)),
                    }],
                }))
            }
            other => Err(rpc_error(-32601, other)),
        })
        .await;

        let ledger = JsonRpcHealthLedger::new(
            client(&wallet_url),
            client(&chain_url),
            CONTRACT,
            Duration::from_millis(10),
        );

        let hash = ledger.submit_health_metrics(USER, &record).await.unwrap();
        assert_eq!(hash, TX);

        let confirmation = ledger.await_confirmation(hash).await.unwrap();
        assert_eq!(confirmation.block_number, Some(16));
        assert_eq!(confirmation.record_index, Some(4));
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_ledger_rejection_and_revert() {
        let wallet_url = fake_rpc::spawn(|_, _| {
            Err(rpc_error(4001, "User denied transaction signature."))
        })
        .await;
        let chain_url = fake_rpc::spawn(|_, _| {
            Ok(json!({"status": "0x0", "blockNumber": "0x1", "logs": []}))
        })
        .await;
        let ledger = JsonRpcHealthLedger::new(
            client(&wallet_url),
            client(&chain_url),
            CONTRACT,
            Duration::from_millis(10),
        );
        let keys = TestKeyPair::new();
        let record = seal_record(
            &keys.public,
            &RecordPlaintext {
                heart_rate: 1,
                blood_pressure: 2,
                oxygen_level: 3,
                risk_level: 4,
            },
        )
        .unwrap();

        assert!(matches!(
            ledger.submit_health_metrics(USER, &record).await,
            Err(LedgerError::Rejected(_))
        ));
        assert_eq!(
            ledger.await_confirmation(TX).await,
            Err(LedgerError::Reverted { tx_hash: TX })
        );
    }

    #[tokio::test]
    async fn test_ledger_send_timeout_is_not_a_rejection() {
        let sends = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&sends);
        let wallet_url = fake_rpc::spawn_delayed(Duration::from_millis(600), move |method, _| {
            assert_eq!(method, "eth_sendTransaction");
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(json!(TX))
        })
        .await;
        let chain_url = fake_rpc::spawn(|method, _| Err(rpc_error(-32601, method))).await;
        let wallet = Arc::new(JsonRpcClient::new(&wallet_url, Duration::from_millis(200)).unwrap());
        let ledger =
            JsonRpcHealthLedger::new(wallet, client(&chain_url), CONTRACT, Duration::from_millis(10));
        let keys = TestKeyPair::new();
        let record = seal_record(
            &keys.public,
            &RecordPlaintext {
                heart_rate: 72,
                blood_pressure: 118,
                oxygen_level: 98,
                risk_level: 1,
            },
        )
        .unwrap();

        let result = ledger.submit_health_metrics(USER, &record).await;

        assert!(
            matches!(result, Err(LedgerError::Unknown(_))),
            "unexpected send outcome: {:?}",
            result
        );
        assert_eq!(sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ledger_read_back() {
        let keys = TestKeyPair::new();
        let record = seal_record(
            &keys.public,
            &RecordPlaintext {
                heart_rate: 72,
                blood_pressure: 118,
                oxygen_level: 98,
                risk_level: 3,
            },
        )
        .unwrap();
        let fields = record.fields();
        let encoded = record_tuple(
            [
                fields[0].as_bytes(),
                fields[1].as_bytes(),
                fields[2].as_bytes(),
                fields[3].as_bytes(),
            ],
            &USER,
        );
        let call_selector = format!("0x{}", hex::encode(abi::selector(abi::USER_HEALTH_RECORDS)));

        let chain_url = fake_rpc::spawn(move |method, params| match method {
            "eth_call" => {
                let data = params[0]["data"].as_str().unwrap();
                assert!(data.starts_with(&call_selector));
                // index is the last word of the calldata
                if data.ends_with("01") {
                    Ok(json!(encoded))
                } else {
                    Ok(json!("0x"))
                }
            }
            other => Err(rpc_error(-32601, other)),
        })
        .await;
        let ledger = JsonRpcHealthLedger::new(
            client(&chain_url),
            client(&chain_url),
            CONTRACT,
            Duration::from_millis(10),
        );

        let stored = ledger.user_health_record(USER, 1).await.unwrap();
        assert_eq!(stored.user, USER);
        assert_eq!(&stored.heart_rate, record.heart_rate());
        assert_eq!(keys.decrypt(&stored.risk_level), 3);

        assert!(matches!(
            ledger.user_health_record(USER, 2).await,
            Err(LedgerError::NotFound(_))
        ));
    }
}
