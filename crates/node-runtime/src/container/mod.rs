//! # Service Container
//!
//! Builds the adapters, the session state machine and the analysis
//! orchestrator from a `NodeConfig`, and owns the background tasks.
//!
//! ## Wiring
//!
//! ```text
//! wallet bridge ──► JsonRpcWallet ──► SessionMachine ◄── WalletWatcher (poll)
//!                        │                 │  ▲
//!                        │                 │  └── event mailbox
//!                        ▼                 ▼
//! chain RPC ─────► RpcBalanceQuery    AnalysisService ──► HttpRiskScorer
//!        └───────────────────────────────► JsonRpcHealthLedger
//! ```

pub mod config;

pub use config::{ConfigError, NodeConfig};

use std::sync::Arc;

use hs_03_wallet_session::{
    event_channel, BalanceQuery, SessionMachine, WalletEvent, WalletProvider,
};
use hs_04_analysis_orchestrator::{
    AnalysisService, HealthLedger, HttpRiskScorer, RiskScorer, ScoringError,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::adapters::{
    JsonRpcClient, JsonRpcHealthLedger, JsonRpcWallet, RpcBalanceQuery, RpcError, WalletWatcher,
};

/// Container construction errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An RPC client could not be built.
    #[error("RPC client: {0}")]
    Rpc(#[from] RpcError),
    /// The scorer client could not be built.
    #[error("Scorer client: {0}")]
    Scorer(#[from] ScoringError),
}

/// Everything a running node holds.
pub struct NodeRuntime {
    config: NodeConfig,
    wallet: Arc<dyn WalletProvider>,
    session: Arc<SessionMachine>,
    analysis: Arc<AnalysisService>,
    events: mpsc::Sender<WalletEvent>,
    mailbox: Mutex<Option<mpsc::Receiver<WalletEvent>>>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    /// Build the HTTP/JSON-RPC adapters described by `config`.
    pub fn from_config(config: NodeConfig) -> Result<Self, RuntimeError> {
        let wallet_rpc = Arc::new(JsonRpcClient::new(
            config.wallet_rpc_url.clone(),
            config.wallet_timeout,
        )?);
        let chain_rpc = Arc::new(JsonRpcClient::new(
            config.chain_rpc_url.clone(),
            config.scorer_timeout,
        )?);

        let wallet = Arc::new(JsonRpcWallet::new(Arc::clone(&wallet_rpc)));
        let balances = Arc::new(RpcBalanceQuery::new(Arc::clone(&chain_rpc)));
        let scorer = Arc::new(HttpRiskScorer::new(
            config.scorer_url.clone(),
            config.scorer_timeout,
        )?);
        let ledger = Arc::new(JsonRpcHealthLedger::new(
            wallet_rpc,
            chain_rpc,
            config.contract_address,
            config.receipt_poll_interval,
        ));

        info!(
            "[hs-node] Wallet bridge {}, chain RPC {}, contract {}",
            config.wallet_rpc_url, config.chain_rpc_url, config.contract_address
        );
        Ok(Self::with_adapters(config, wallet, balances, scorer, ledger))
    }

    /// Wire the services around the given adapters.
    pub fn with_adapters(
        config: NodeConfig,
        wallet: Arc<dyn WalletProvider>,
        balances: Arc<dyn BalanceQuery>,
        scorer: Arc<dyn RiskScorer>,
        ledger: Arc<dyn HealthLedger>,
    ) -> Self {
        let session = Arc::new(SessionMachine::new(
            config.session.clone(),
            Some(Arc::clone(&wallet)),
            balances,
        ));
        let analysis = Arc::new(AnalysisService::new(
            config.analysis.clone(),
            Arc::new(config.public_key.clone()),
            session.clone(),
            scorer,
            ledger,
        ));
        let (events, mailbox) = event_channel();
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            wallet,
            session,
            analysis,
            events,
            mailbox: Mutex::new(Some(mailbox)),
            shutdown,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Configuration the node was built from.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Session state machine.
    pub fn session(&self) -> Arc<SessionMachine> {
        Arc::clone(&self.session)
    }

    /// Analysis orchestrator.
    pub fn analysis(&self) -> Arc<AnalysisService> {
        Arc::clone(&self.analysis)
    }

    /// Sender into the session's event mailbox.
    pub fn events(&self) -> mpsc::Sender<WalletEvent> {
        self.events.clone()
    }

    /// Start the event loop and the wallet watcher. A second call is a
    /// no-op.
    pub fn start_background_tasks(&self) {
        let Some(mailbox) = self.mailbox.lock().take() else {
            return;
        };
        let mut tasks = self.tasks.lock();
        tasks.push(self.session().spawn_event_loop(mailbox));

        let watcher = WalletWatcher::new(
            Arc::clone(&self.wallet),
            self.events.clone(),
            self.config.wallet_poll_interval,
        );
        tasks.push(tokio::spawn(watcher.run(self.shutdown.subscribe())));
        info!("[hs-node] Background tasks started");
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            // The event loop only ends when every sender is gone.
            task.abort();
            let _ = task.await;
        }
        info!("[hs-node] Shutdown complete");
    }
}
