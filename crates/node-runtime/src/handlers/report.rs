//! Plain-text reports for the CLI.

use std::fmt::Write;

use hs_02_vital_validation::VitalSigns;
use hs_03_wallet_session::{SessionConfig, SessionSnapshot, SessionState};
use hs_04_analysis_orchestrator::{StoredHealthRecord, SubmissionReceipt};

/// Session summary. Includes the faucet hint when the balance is under
/// `config.low_balance_hint`.
pub fn render_status(snapshot: &SessionSnapshot, config: &SessionConfig, faucet_url: &str) -> String {
    let symbol = &config.network.native_currency.symbol;
    let mut out = String::new();
    let _ = writeln!(out, "State:   {}", snapshot.state);

    if let Some(address) = snapshot.address() {
        let _ = writeln!(out, "Account: {}", address);
        let _ = writeln!(out, "Balance: {} {}", snapshot.balance(), symbol);
    }
    if let Some(chain) = snapshot.session.chain_id() {
        let _ = writeln!(out, "Chain:   {}", chain);
    }

    match snapshot.state {
        SessionState::Disconnected => {
            let _ = writeln!(out, "Please connect your wallet to access the Health Risk Calculator.");
        }
        SessionState::ConnectedWrongNetwork => {
            let _ = writeln!(
                out,
                "Please switch to the {} to use the Health Risk Calculator.",
                config.network.chain_name
            );
        }
        _ => {}
    }
    if snapshot.needs_funding(config.low_balance_hint) {
        let _ = writeln!(out, "Low balance. Get {} tokens from the faucet: {}", symbol, faucet_url);
    }
    out
}

/// Out-of-range notes for validated inputs; empty when all are normal.
pub fn render_advisories(vitals: &VitalSigns) -> String {
    let mut out = String::new();
    for advisory in vitals.advisories() {
        let _ = writeln!(
            out,
            "Note: {} {} {} is outside the normal range {}-{}",
            advisory.field.label(),
            advisory.value,
            advisory.field.unit(),
            advisory.normal.0,
            advisory.normal.1
        );
    }
    out
}

/// Result of a successful analysis.
pub fn render_receipt(receipt: &SubmissionReceipt, config: &SessionConfig) -> String {
    let tx = receipt.tx_hash.to_hex();
    let mut out = String::new();
    let _ = writeln!(out, "{}", receipt.assessment.summary());
    let _ = writeln!(out, "Health data recorded on-chain.");
    let _ = writeln!(out, "Transaction: {}", tx);
    if let Some(index) = receipt.record_index {
        let _ = writeln!(out, "Record index: {}", index);
    }
    if let Some(url) = config.network.tx_url(&tx) {
        let _ = writeln!(out, "Explorer: {}", url);
    }
    out
}

/// A stored record. Values stay encrypted.
pub fn render_record(index: u64, record: &StoredHealthRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Record #{} of {}", index, record.user);
    let fields = [
        ("heart_rate", &record.heart_rate),
        ("blood_pressure", &record.blood_pressure),
        ("oxygen_level", &record.oxygen_level),
        ("risk_level", &record.risk_level),
    ];
    for (name, value) in fields {
        let _ = writeln!(out, "  {:<15} {} ({} hex digits)", name, value.as_str(), value.digit_len());
    }
    out
}
