//! Shared fixtures: a Paillier key pair and a wired node.

use std::sync::Arc;

use hs_01_ciphertext_encoder::{CiphertextHex, PublicKey};
use hs_03_wallet_session::{
    MockBalanceQuery, MockWalletProvider, SessionConfig, SessionMachine, WalletSessionApi,
};
use hs_04_analysis_orchestrator::{
    AnalysisConfig, AnalysisService, MockHealthLedger, MockRiskScorer,
};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use shared_types::{Address, ChainId, Wei};

/// Connected account used by every fixture.
pub const USER: Address = Address([0x5A; 20]);

/// Paillier key pair over `2^127 - 1` and `2^89 - 1`.
pub struct TestKeyPair {
    pub public: PublicKey,
    n: BigUint,
    n_squared: BigUint,
    lambda: BigUint,
    mu: BigUint,
}

impl TestKeyPair {
    pub fn new() -> Self {
        let one = BigUint::one();
        let p = (BigUint::one() << 127usize) - &one;
        let q = (BigUint::one() << 89usize) - &one;
        let n = &p * &q;
        let n_squared = &n * &n;
        let public = PublicKey::with_standard_generator(n.clone()).unwrap();

        let lambda = (&p - &one).lcm(&(&q - &one));
        let l = (public.g().modpow(&lambda, &n_squared) - &one) / &n;
        let mu = l.modinv(&n).unwrap();

        Self {
            public,
            n,
            n_squared,
            lambda,
            mu,
        }
    }

    /// Decrypt a hex ciphertext to its plaintext.
    pub fn decrypt(&self, c: &CiphertextHex) -> u64 {
        let c = BigUint::from_bytes_be(c.as_bytes());
        let u = c.modpow(&self.lambda, &self.n_squared);
        let m = (((u - BigUint::one()) / &self.n) * &self.mu) % &self.n;
        m.to_u64_digits().first().copied().unwrap_or(0)
    }
}

impl Default for TestKeyPair {
    fn default() -> Self {
        Self::new()
    }
}

/// Session and orchestrator sharing one set of mocks.
pub struct Node {
    pub keys: TestKeyPair,
    pub wallet: Arc<MockWalletProvider>,
    pub balances: Arc<MockBalanceQuery>,
    pub scorer: Arc<MockRiskScorer>,
    pub ledger: Arc<MockHealthLedger>,
    pub session: Arc<SessionMachine>,
    pub service: Arc<AnalysisService>,
}

/// Builder for [`Node`].
pub struct NodeBuilder {
    chain: ChainId,
    balance: Wei,
    session_config: SessionConfig,
    scorer: MockRiskScorer,
    ledger: MockHealthLedger,
    wallet: Option<MockWalletProvider>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self {
            chain: ChainId::SHIELD_TESTNET,
            balance: Wei::from_tokens(5),
            session_config: SessionConfig::for_testing(),
            scorer: MockRiskScorer::returning(1, "Low"),
            ledger: MockHealthLedger::default(),
            wallet: None,
        }
    }

    pub fn on_chain(mut self, chain: ChainId) -> Self {
        self.chain = chain;
        self
    }

    pub fn balance(mut self, tokens: &str) -> Self {
        self.balance = Wei::from_ether_str(tokens).unwrap();
        self
    }

    pub fn auto_switch(mut self) -> Self {
        self.session_config.auto_switch_network = true;
        self
    }

    pub fn scorer(mut self, scorer: MockRiskScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn ledger(mut self, ledger: MockHealthLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn wallet(mut self, wallet: MockWalletProvider) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Build without connecting.
    pub fn build(self) -> Node {
        let keys = TestKeyPair::new();
        let wallet = Arc::new(
            self.wallet
                .unwrap_or_else(|| MockWalletProvider::new(USER, self.chain)),
        );
        let balances = Arc::new(MockBalanceQuery::with_balance(USER, self.balance));
        let session = Arc::new(SessionMachine::new(
            self.session_config,
            Some(wallet.clone()),
            balances.clone(),
        ));
        let scorer = Arc::new(self.scorer);
        let ledger = Arc::new(self.ledger);
        let service = Arc::new(AnalysisService::new(
            AnalysisConfig::for_testing(),
            Arc::new(keys.public.clone()),
            session.clone(),
            scorer.clone(),
            ledger.clone(),
        ));

        Node {
            keys,
            wallet,
            balances,
            scorer,
            ledger,
            session,
            service,
        }
    }

    /// Build and connect.
    pub async fn connected(self) -> Node {
        let node = self.build();
        node.session.connect().await.unwrap();
        node
    }
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
