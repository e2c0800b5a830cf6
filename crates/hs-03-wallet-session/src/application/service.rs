//! # Session Machine
//!
//! Single owner of `WalletSession`. Every transition runs under one async
//! transition lock and publishes a complete `SessionSnapshot` when it
//! finishes; readers never observe a half-applied transition.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, ChainId, Wei};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::domain::{
    SessionError, SessionSnapshot, SessionState, WalletError, WalletEvent, WalletSession,
    EVENT_MAILBOX_CAPACITY,
};
use crate::ports::{BalanceQuery, SessionReader, WalletProvider, WalletSessionApi};

/// Create the bounded mailbox provider events are posted into.
pub fn event_channel() -> (mpsc::Sender<WalletEvent>, mpsc::Receiver<WalletEvent>) {
    mpsc::channel(EVENT_MAILBOX_CAPACITY)
}

/// Wallet session state machine.
pub struct SessionMachine {
    config: SessionConfig,
    /// `None` when no wallet capability is installed.
    wallet: Option<Arc<dyn WalletProvider>>,
    balances: Arc<dyn BalanceQuery>,
    committed: RwLock<SessionSnapshot>,
    transition: Mutex<()>,
}

impl SessionMachine {
    /// Create a machine in `Disconnected`.
    pub fn new(
        config: SessionConfig,
        wallet: Option<Arc<dyn WalletProvider>>,
        balances: Arc<dyn BalanceQuery>,
    ) -> Self {
        Self {
            config,
            wallet,
            balances,
            committed: RwLock::new(SessionSnapshot::disconnected()),
            transition: Mutex::new(()),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connected with a balance under the low-balance hint.
    pub fn needs_funding(&self) -> bool {
        self.snapshot().needs_funding(self.config.low_balance_hint)
    }

    /// Drain `events` into `handle_event` until every sender is dropped.
    pub fn spawn_event_loop(
        self: Arc<Self>,
        mut events: mpsc::Receiver<WalletEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.handle_event(event).await;
            }
            debug!("[hs-03] Wallet event mailbox closed");
        })
    }

    fn commit(&self, state: SessionState, session: WalletSession) -> SessionSnapshot {
        let snapshot = SessionSnapshot { state, session };
        *self.committed.write() = snapshot.clone();
        debug!(state = %state, "[hs-03] Session committed");
        snapshot
    }

    fn classify(&self, chain: ChainId) -> SessionState {
        if chain == self.config.target_chain {
            SessionState::ConnectedReady
        } else {
            SessionState::ConnectedWrongNetwork
        }
    }

    /// Balance of `address`, or `fallback` when the query fails.
    async fn fetch_balance(&self, address: Address, fallback: Wei) -> Wei {
        match self.balances.balance_of(address).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(
                    address = %address.short(),
                    "[hs-03] Balance query failed, keeping last known: {}",
                    e
                );
                fallback
            }
        }
    }

    fn fail_connect(&self, err: SessionError) -> SessionError {
        warn!("[hs-03] Connect failed: {}", err);
        self.commit(SessionState::Disconnected, WalletSession::disconnected());
        err
    }

    async fn connect_locked(&self) -> Result<SessionSnapshot, SessionError> {
        let Some(wallet) = self.wallet.clone() else {
            return Err(self.fail_connect(SessionError::WalletUnavailable(
                "no wallet provider installed".to_string(),
            )));
        };

        self.commit(SessionState::Connecting, WalletSession::disconnected());

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => return Err(self.fail_connect(SessionError::from_connect_failure(e))),
        };
        let Some(address) = accounts.first().copied() else {
            return Err(self.fail_connect(SessionError::WalletUnavailable(
                "wallet exposed no accounts".to_string(),
            )));
        };
        let chain = match wallet.chain_id().await {
            Ok(chain) => chain,
            Err(e) => return Err(self.fail_connect(SessionError::from_connect_failure(e))),
        };

        let balance = self.fetch_balance(address, Wei::ZERO).await;
        let state = self.classify(chain);
        let snapshot = self.commit(state, WalletSession::connected(address, chain, balance));
        info!(
            address = %address.short(),
            chain = %chain,
            balance = %balance,
            "[hs-03] Wallet connected ({})",
            state
        );

        Ok(self.auto_switch(snapshot).await)
    }

    /// Attempt `ensure_network` when configured to; failures stay logged.
    async fn auto_switch(&self, snapshot: SessionSnapshot) -> SessionSnapshot {
        if snapshot.state != SessionState::ConnectedWrongNetwork || !self.config.auto_switch_network
        {
            return snapshot;
        }
        match self.ensure_network_locked().await {
            Ok(switched) => switched,
            Err(e) => {
                warn!("[hs-03] Automatic network switch failed: {}", e);
                self.snapshot()
            }
        }
    }

    async fn ensure_network_locked(&self) -> Result<SessionSnapshot, SessionError> {
        let current = self.snapshot();
        match current.state {
            SessionState::ConnectedReady => return Ok(current),
            SessionState::Disconnected | SessionState::Connecting => {
                return Err(SessionError::NotConnected)
            }
            SessionState::ConnectedWrongNetwork => {}
        }
        let (Some(wallet), Some(address)) = (self.wallet.clone(), current.address()) else {
            return Err(SessionError::NotConnected);
        };

        let target = self.config.target_chain;
        info!(target = %target, "[hs-03] Requesting network switch");
        match wallet.switch_chain(target).await {
            Ok(()) => {}
            Err(WalletError::UnrecognizedChain(_)) => {
                info!(
                    "[hs-03] Wallet does not know {}, registering {}",
                    target, self.config.network.chain_name
                );
                wallet
                    .add_chain(&self.config.network)
                    .await
                    .map_err(|e| {
                        SessionError::NetworkSwitchFailed(format!(
                            "network registration failed: {}",
                            e
                        ))
                    })?;
                wallet.switch_chain(target).await.map_err(|e| {
                    SessionError::NetworkSwitchFailed(format!(
                        "switch after registration failed: {}",
                        e
                    ))
                })?;
            }
            Err(e) => return Err(SessionError::NetworkSwitchFailed(e.to_string())),
        }

        let balance = self.fetch_balance(address, current.balance()).await;
        let snapshot = self.commit(
            SessionState::ConnectedReady,
            WalletSession::connected(address, target, balance),
        );
        info!(balance = %balance, "[hs-03] Switched to {}", target);
        Ok(snapshot)
    }

    async fn on_accounts_changed(&self, accounts: Vec<Address>) {
        let current = self.snapshot();
        let Some(first) = accounts.first().copied() else {
            if current.state != SessionState::Disconnected {
                info!("[hs-03] Wallet exposed no accounts, clearing session");
                self.commit(SessionState::Disconnected, WalletSession::disconnected());
            }
            return;
        };
        if current.state == SessionState::Disconnected {
            debug!("[hs-03] Account change while disconnected, ignored");
            return;
        }
        if current.state.is_connected() && current.address() == Some(first) {
            debug!("[hs-03] Account unchanged, nothing to do");
            return;
        }
        info!(address = %first.short(), "[hs-03] Account changed, reconnecting");
        if let Err(e) = self.connect_locked().await {
            warn!("[hs-03] Reconnect after account change failed: {}", e);
        }
    }

    async fn on_chain_changed(&self, chain: ChainId) {
        let current = self.snapshot();
        if !current.state.is_connected() {
            debug!(chain = %chain, "[hs-03] Chain change while not connected, ignored");
            return;
        }
        if current.session.chain_id() == Some(chain) {
            debug!(chain = %chain, "[hs-03] Chain unchanged, nothing to do");
            return;
        }
        let Some(address) = current.address() else {
            return;
        };

        let balance = self.fetch_balance(address, current.balance()).await;
        let state = self.classify(chain);
        let snapshot = self.commit(state, WalletSession::connected(address, chain, balance));
        info!(chain = %chain, "[hs-03] Chain changed ({})", state);
        self.auto_switch(snapshot).await;
    }
}

impl SessionReader for SessionMachine {
    fn snapshot(&self) -> SessionSnapshot {
        self.committed.read().clone()
    }
}

#[async_trait]
impl WalletSessionApi for SessionMachine {
    async fn connect(&self) -> Result<SessionSnapshot, SessionError> {
        let _guard = self.transition.lock().await;
        self.connect_locked().await
    }

    async fn ensure_network(&self) -> Result<SessionSnapshot, SessionError> {
        let _guard = self.transition.lock().await;
        self.ensure_network_locked().await
    }

    async fn disconnect(&self) {
        let _guard = self.transition.lock().await;
        let current = self.snapshot();
        if let (Some(wallet), true) = (self.wallet.as_ref(), current.state.is_connected()) {
            match wallet.revoke_permissions().await {
                Ok(()) => debug!("[hs-03] Wallet permissions revoked"),
                Err(WalletError::Unsupported(_)) => {
                    debug!("[hs-03] Wallet cannot revoke permissions")
                }
                Err(e) => warn!("[hs-03] Permission revoke failed: {}", e),
            }
        }
        self.commit(SessionState::Disconnected, WalletSession::disconnected());
        info!("[hs-03] Wallet disconnected");
    }

    async fn refresh_balance(&self, address: Address) -> Result<Wei, SessionError> {
        let _guard = self.transition.lock().await;
        let current = self.snapshot();
        if !current.state.is_connected() {
            return Err(SessionError::NotConnected);
        }
        if current.address() != Some(address) {
            debug!(address = %address.short(), "[hs-03] Stale balance refresh ignored");
            return Ok(current.balance());
        }

        let balance = self.fetch_balance(address, current.balance()).await;
        self.commit(current.state, current.session.with_balance(balance));
        Ok(balance)
    }

    async fn handle_event(&self, event: WalletEvent) {
        let _guard = self.transition.lock().await;
        debug!(?event, "[hs-03] Wallet event");
        match event {
            WalletEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts).await,
            WalletEvent::ChainChanged(chain) => self.on_chain_changed(chain).await,
        }
    }
}
