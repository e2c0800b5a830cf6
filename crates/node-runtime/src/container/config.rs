//! # Node Configuration
//!
//! Everything the node needs at startup, read once from `HS_*` environment
//! variables over built-in defaults. Nothing here is mutated afterwards.
//!
//! ## Required
//!
//! - `HS_CONTRACT_ADDRESS`
//! - `HS_PUBLIC_KEY_N`, `HS_PUBLIC_KEY_G` (hex, `0x` optional)

use std::str::FromStr;
use std::time::Duration;

use hs_01_ciphertext_encoder::PublicKey;
use hs_03_wallet_session::{NativeCurrency, NetworkDefinition, SessionConfig};
use hs_04_analysis_orchestrator::AnalysisConfig;
use shared_types::Address;
use thiserror::Error;

/// Reference risk scorer.
pub const DEFAULT_SCORER_URL: &str =
    "https://g74uycczphoqsuyfbw4lbfdg2e0kmrcp.lambda-url.ap-south-1.on.aws/";

/// Local wallet bridge.
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";

/// Wallet requests wait on the user (connect, switch, sign).
pub const DEFAULT_WALLET_TIMEOUT_SECS: u64 = 600;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but unusable.
    #[error("{var} is invalid: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// What went wrong
        reason: String,
    },
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Session state machine.
    pub session: SessionConfig,
    /// Analysis orchestrator.
    pub analysis: AnalysisConfig,
    /// Paillier public key used for every record.
    pub public_key: PublicKey,
    /// Ledger contract.
    pub contract_address: Address,
    /// Risk scorer endpoint.
    pub scorer_url: String,
    /// HTTP timeout for the scorer.
    pub scorer_timeout: Duration,
    /// Wallet bridge endpoint (accounts, signing, network switching).
    pub wallet_rpc_url: String,
    /// Per-request timeout on the wallet bridge, covering user approval.
    pub wallet_timeout: Duration,
    /// Chain endpoint (balances, receipts, reads).
    pub chain_rpc_url: String,
    /// Receipt polling cadence.
    pub receipt_poll_interval: Duration,
    /// Account/chain change polling cadence.
    pub wallet_poll_interval: Duration,
}

impl NodeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Network definition
        let defaults = NetworkDefinition::shield_testnet();
        let chain_id = parse_or(&get, "HS_TARGET_CHAIN_ID", defaults.chain_id)?;
        let decimals = parse_or(
            &get,
            "HS_CURRENCY_DECIMALS",
            defaults.native_currency.decimals,
        )?;
        let network = NetworkDefinition {
            chain_id,
            chain_name: get("HS_CHAIN_NAME").unwrap_or(defaults.chain_name),
            native_currency: NativeCurrency {
                name: get("HS_CURRENCY_NAME").unwrap_or(defaults.native_currency.name),
                symbol: get("HS_CURRENCY_SYMBOL").unwrap_or(defaults.native_currency.symbol),
                decimals,
            },
            rpc_urls: get("HS_CHAIN_RPC_URL")
                .map(|u| vec![u])
                .unwrap_or(defaults.rpc_urls),
            block_explorer_urls: get("HS_EXPLORER_URL")
                .map(|u| vec![u])
                .unwrap_or(defaults.block_explorer_urls),
        };
        let chain_rpc_url = network
            .primary_rpc()
            .map(str::to_string)
            .ok_or(ConfigError::Missing("HS_CHAIN_RPC_URL"))?;

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            target_chain: chain_id,
            network,
            auto_switch_network: parse_bool_or(
                &get,
                "HS_AUTO_SWITCH_NETWORK",
                session_defaults.auto_switch_network,
            )?,
            low_balance_hint: parse_or(
                &get,
                "HS_LOW_BALANCE_HINT",
                session_defaults.low_balance_hint,
            )?,
        };

        let analysis_defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            min_analysis_balance: parse_or(
                &get,
                "HS_MIN_ANALYSIS_BALANCE",
                analysis_defaults.min_analysis_balance,
            )?,
            faucet_url: get("HS_FAUCET_URL").unwrap_or(analysis_defaults.faucet_url),
            confirmation_timeout: Duration::from_secs(parse_or(
                &get,
                "HS_CONFIRMATION_TIMEOUT_SECS",
                analysis_defaults.confirmation_timeout.as_secs(),
            )?),
        };

        // Key and contract
        let n = get("HS_PUBLIC_KEY_N").ok_or(ConfigError::Missing("HS_PUBLIC_KEY_N"))?;
        let g = get("HS_PUBLIC_KEY_G").ok_or(ConfigError::Missing("HS_PUBLIC_KEY_G"))?;
        let public_key = PublicKey::from_hex(&n, &g).map_err(|e| ConfigError::Invalid {
            var: "HS_PUBLIC_KEY_N",
            reason: e.to_string(),
        })?;
        let contract_address = parse_required(&get, "HS_CONTRACT_ADDRESS")?;

        Ok(Self {
            session,
            analysis,
            public_key,
            contract_address,
            scorer_url: get("HS_SCORER_URL").unwrap_or_else(|| DEFAULT_SCORER_URL.to_string()),
            scorer_timeout: Duration::from_secs(parse_or(&get, "HS_SCORER_TIMEOUT_SECS", 30)?),
            wallet_rpc_url: get("HS_WALLET_RPC_URL")
                .unwrap_or_else(|| DEFAULT_WALLET_RPC_URL.to_string()),
            wallet_timeout: Duration::from_secs(parse_or(
                &get,
                "HS_WALLET_TIMEOUT_SECS",
                DEFAULT_WALLET_TIMEOUT_SECS,
            )?),
            chain_rpc_url,
            receipt_poll_interval: Duration::from_millis(parse_or(
                &get,
                "HS_RECEIPT_POLL_MILLIS",
                1500,
            )?),
            wallet_poll_interval: Duration::from_millis(parse_or(
                &get,
                "HS_WALLET_POLL_MILLIS",
                2000,
            )?),
        })
    }
}

fn parse_or<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_required<G, T>(get: &G, var: &'static str) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get(var).ok_or(ConfigError::Missing(var))?;
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

fn parse_bool_or<G>(get: &G, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                reason: format!("expected a boolean, got {:?}", v),
            }),
        },
    }
}
