//! # Outbound Ports
//!
//! Traits for the wallet provider and the chain balance source.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Address, ChainId, Wei};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::{NetworkDefinition, WalletError};

/// Wallet provider - outbound port.
///
/// Models an EIP-1193 provider: request accounts, report the chain,
/// switch or register chains and revoke permissions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// `eth_accounts`. Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// `wallet_switchEthereumChain`. Unknown chains yield
    /// `WalletError::UnrecognizedChain`.
    async fn switch_chain(&self, chain: ChainId) -> Result<(), WalletError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, network: &NetworkDefinition) -> Result<(), WalletError>;

    /// `wallet_revokePermissions`. Optional; `Unsupported` is acceptable.
    async fn revoke_permissions(&self) -> Result<(), WalletError>;
}

/// Native balance source - outbound port.
#[async_trait]
pub trait BalanceQuery: Send + Sync {
    /// Native balance of `address`.
    async fn balance_of(&self, address: Address) -> Result<Wei, WalletError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock wallet provider for testing.
///
/// Knows its current chain plus a list of registered chains. Switching to an
/// unregistered chain fails with `UnrecognizedChain` until `add_chain` runs.
pub struct MockWalletProvider {
    accounts: Mutex<Vec<Address>>,
    chain: Mutex<ChainId>,
    known_chains: Mutex<Vec<ChainId>>,
    /// Reject `request_accounts` as the user would.
    pub reject_connect: bool,
    /// Fail every switch with a generic provider error.
    pub fail_switch: bool,
    /// Reject `add_chain`.
    pub reject_add: bool,
    /// Report `revoke_permissions` as unsupported.
    pub revoke_unsupported: bool,
    request_accounts_calls: AtomicUsize,
    switch_calls: AtomicUsize,
    add_calls: AtomicUsize,
    revoke_calls: AtomicUsize,
}

impl MockWalletProvider {
    /// A wallet exposing `account` while on `chain`.
    pub fn new(account: Address, chain: ChainId) -> Self {
        Self {
            accounts: Mutex::new(vec![account]),
            chain: Mutex::new(chain),
            known_chains: Mutex::new(vec![chain]),
            reject_connect: false,
            fail_switch: false,
            reject_add: false,
            revoke_unsupported: false,
            request_accounts_calls: AtomicUsize::new(0),
            switch_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            revoke_calls: AtomicUsize::new(0),
        }
    }

    /// Pre-register another chain.
    pub fn with_known_chain(self, chain: ChainId) -> Self {
        self.known_chains.lock().push(chain);
        self
    }

    /// Replace the exposed accounts.
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock() = accounts;
    }

    /// Move the wallet to another chain, as the user would.
    pub fn set_chain(&self, chain: ChainId) {
        *self.chain.lock() = chain;
    }

    /// Chain the wallet is currently on.
    pub fn current_chain(&self) -> ChainId {
        *self.chain.lock()
    }

    /// Number of `request_accounts` calls.
    pub fn request_accounts_calls(&self) -> usize {
        self.request_accounts_calls.load(Ordering::SeqCst)
    }

    /// Number of `switch_chain` calls.
    pub fn switch_calls(&self) -> usize {
        self.switch_calls.load(Ordering::SeqCst)
    }

    /// Number of `add_chain` calls.
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    /// Number of `revoke_permissions` calls.
    pub fn revoke_calls(&self) -> usize {
        self.revoke_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request_accounts_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_connect {
            return Err(WalletError::UserRejected);
        }
        Ok(self.accounts.lock().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.accounts.lock().clone())
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(self.current_chain())
    }

    async fn switch_chain(&self, chain: ChainId) -> Result<(), WalletError> {
        self.switch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_switch {
            return Err(WalletError::Provider {
                code: -32603,
                message: "Mock failure".to_string(),
            });
        }
        if !self.known_chains.lock().contains(&chain) {
            return Err(WalletError::UnrecognizedChain(chain));
        }
        self.set_chain(chain);
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDefinition) -> Result<(), WalletError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_add {
            return Err(WalletError::UserRejected);
        }
        let mut known = self.known_chains.lock();
        if !known.contains(&network.chain_id) {
            known.push(network.chain_id);
        }
        Ok(())
    }

    async fn revoke_permissions(&self) -> Result<(), WalletError> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        if self.revoke_unsupported {
            return Err(WalletError::Unsupported(
                "wallet_revokePermissions".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mock balance source for testing.
#[derive(Default)]
pub struct MockBalanceQuery {
    balances: Mutex<HashMap<Address, Wei>>,
    should_fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockBalanceQuery {
    /// Source reporting `balance` for `address` and zero elsewhere.
    pub fn with_balance(address: Address, balance: Wei) -> Self {
        let query = Self::default();
        query.set_balance(address, balance);
        query
    }

    /// Set the balance reported for `address`.
    pub fn set_balance(&self, address: Address, balance: Wei) {
        self.balances.lock().insert(address, balance);
    }

    /// Toggle failure.
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `balance_of` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceQuery for MockBalanceQuery {
    async fn balance_of(&self, address: Address) -> Result<Wei, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(WalletError::Unavailable("Mock failure".to_string()));
        }
        Ok(self
            .balances
            .lock()
            .get(&address)
            .copied()
            .unwrap_or(Wei::ZERO))
    }
}
