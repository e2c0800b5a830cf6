//! # Wallet Watcher
//!
//! The HTTP bridge has no push channel, so account and network changes are
//! detected by polling `eth_accounts` / `eth_chainId` and forwarded into the
//! session's event mailbox.

use std::sync::Arc;
use std::time::Duration;

use hs_03_wallet_session::{WalletEvent, WalletProvider};
use shared_types::{Address, ChainId};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// One poll of the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    /// `eth_accounts`
    pub accounts: Vec<Address>,
    /// `eth_chainId`
    pub chain: ChainId,
}

/// Events implied by moving from `previous` to `current`.
///
/// The first observation is a baseline and produces nothing.
pub fn diff(previous: Option<&Observed>, current: &Observed) -> Vec<WalletEvent> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    let mut events = Vec::new();
    if previous.accounts != current.accounts {
        events.push(WalletEvent::AccountsChanged(current.accounts.clone()));
    }
    if previous.chain != current.chain {
        events.push(WalletEvent::ChainChanged(current.chain));
    }
    events
}

/// Polls a wallet and emits change events.
pub struct WalletWatcher {
    wallet: Arc<dyn WalletProvider>,
    events: mpsc::Sender<WalletEvent>,
    interval: Duration,
    last: Option<Observed>,
}

impl WalletWatcher {
    /// Create a watcher.
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        events: mpsc::Sender<WalletEvent>,
        interval: Duration,
    ) -> Self {
        Self {
            wallet,
            events,
            interval,
            last: None,
        }
    }

    /// Poll once and forward any changes. Returns `false` once the mailbox
    /// is closed.
    pub async fn poll_once(&mut self) -> bool {
        let observed = match (self.wallet.accounts().await, self.wallet.chain_id().await) {
            (Ok(accounts), Ok(chain)) => Observed { accounts, chain },
            (Err(e), _) | (_, Err(e)) => {
                debug!("[hs-node] Wallet poll skipped: {}", e);
                return true;
            }
        };

        for event in diff(self.last.as_ref(), &observed) {
            debug!("[hs-node] Wallet event: {:?}", event);
            if self.events.send(event).await.is_err() {
                return false;
            }
        }
        self.last = Some(observed);
        true
    }

    /// Poll until `shutdown` flips to `true` or the mailbox closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("[hs-node] Wallet watcher started ({:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.poll_once().await {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[hs-node] Wallet watcher stopped");
    }
}
