//! # Analysis Configuration

use serde::{Deserialize, Serialize};
use shared_types::Wei;
use std::time::Duration;

/// Default acquisition hint shown with `InsufficientBalance`.
pub const DEFAULT_FAUCET_URL: &str = "https://faucet.gateway.tech/";

/// Orchestrator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum balance required to start an analysis (1 token by default).
    pub min_analysis_balance: Wei,

    /// Where to obtain tokens.
    pub faucet_url: String,

    /// Upper bound on the confirmation wait.
    pub confirmation_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_analysis_balance: Wei::from_tokens(1),
            faucet_url: DEFAULT_FAUCET_URL.to_string(),
            confirmation_timeout: Duration::from_secs(120),
        }
    }
}

impl AnalysisConfig {
    /// Create a config for testing (short confirmation bound).
    pub fn for_testing() -> Self {
        Self {
            confirmation_timeout: Duration::from_millis(200),
            ..Self::default()
        }
    }
}
