//! # Health-Shield Node
//!
//! Command-line front end: connect a wallet, switch networks, submit vital
//! signs for analysis and read stored records.
//!
//! ## Startup
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`, to stderr)
//! 2. Load configuration from `HS_*` variables
//! 3. Build the runtime (wallet bridge, chain RPC, scorer, ledger)
//! 4. Run the command

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hs_02_vital_validation::{validate, RawVitalSigns, Validation};
use hs_03_wallet_session::{SessionReader, WalletSessionApi};
use hs_04_analysis_orchestrator::AnalysisApi;
use node_runtime::handlers::{render_advisories, render_receipt, render_record, render_status};
use node_runtime::{NodeConfig, NodeRuntime};
use shared_types::Address;

/// Health-Shield: encrypted health risk analysis on-chain
#[derive(Parser, Debug)]
#[command(name = "hs-node")]
#[command(version, about = "Encrypted health risk analysis on the Gateway Shield Testnet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and show the session
    Status,
    /// Connect the wallet (switching networks if configured)
    Connect,
    /// Switch the wallet to the target network, adding it if unknown
    SwitchNetwork,
    /// Score vital signs and record them encrypted on-chain
    Analyze {
        /// Heart rate, BPM
        #[arg(long)]
        heart_rate: String,
        /// Systolic blood pressure, mmHg
        #[arg(long)]
        blood_pressure: String,
        /// Oxygen saturation, percent
        #[arg(long)]
        oxygen_level: String,
    },
    /// Read a stored (encrypted) record
    Record {
        /// Record index
        #[arg(long)]
        index: u64,
        /// Account to read; defaults to the connected account
        #[arg(long)]
        account: Option<Address>,
    },
    /// Revoke the wallet connection
    Disconnect,
    /// Follow account and network changes until Ctrl-C
    Watch,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    info!(
        "[hs-node] Health-Shield v{} targeting {} ({})",
        node_runtime::VERSION,
        config.session.network.chain_name,
        config.session.target_chain
    );
    let node = NodeRuntime::from_config(config).context("Failed to build runtime")?;

    run(&node, cli.command).await
}

async fn run(node: &NodeRuntime, command: Command) -> Result<()> {
    let session = node.session();
    let config = node.config();
    let faucet = config.analysis.faucet_url.as_str();

    match command {
        Command::Status | Command::Connect => {
            session.connect().await.context("Wallet connection failed")?;
            print!("{}", render_status(&session.snapshot(), &config.session, faucet));
        }
        Command::SwitchNetwork => {
            session.connect().await.context("Wallet connection failed")?;
            let snapshot = session
                .ensure_network()
                .await
                .context("Network switch failed")?;
            print!("{}", render_status(&snapshot, &config.session, faucet));
        }
        Command::Analyze {
            heart_rate,
            blood_pressure,
            oxygen_level,
        } => {
            let raw = RawVitalSigns::new(heart_rate, blood_pressure, oxygen_level);
            if let Validation::Valid(vitals) = validate(&raw) {
                print!("{}", render_advisories(&vitals));
            }
            session.connect().await.context("Wallet connection failed")?;

            match node.analysis().submit(raw).await {
                Ok(receipt) => print!("{}", render_receipt(&receipt, &config.session)),
                Err(e) => {
                    if let Some(tx) = e.tx_hash() {
                        warn!("[hs-node] Transaction {} may still be mined", tx);
                    }
                    bail!("{} ({})", e.user_message(), e);
                }
            }
        }
        Command::Record { index, account } => {
            let account = match account {
                Some(account) => account,
                None => session
                    .connect()
                    .await
                    .context("Wallet connection failed")?
                    .address()
                    .context("No connected account")?,
            };
            let record = node
                .analysis()
                .read_record(account, index)
                .await
                .with_context(|| format!("Failed to read record {} of {}", index, account))?;
            print!("{}", render_record(index, &record));
        }
        Command::Disconnect => {
            session.connect().await.context("Wallet connection failed")?;
            session.disconnect().await;
            print!("{}", render_status(&session.snapshot(), &config.session, faucet));
        }
        Command::Watch => watch_session(node).await?,
    }
    Ok(())
}

async fn watch_session(node: &NodeRuntime) -> Result<()> {
    let session = node.session();
    session.connect().await.context("Wallet connection failed")?;
    node.start_background_tasks();

    let (stop_tx, mut stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    let config = node.config();
    let mut last = None;
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = session.snapshot();
                if last.as_ref() != Some(&snapshot) {
                    print!("{}", render_status(&snapshot, &config.session, &config.analysis.faucet_url));
                    last = Some(snapshot);
                }
            }
            _ = stop_rx.changed() => {
                info!("[hs-node] Shutdown signal received");
                break;
            }
        }
    }

    node.shutdown().await;
    Ok(())
}
