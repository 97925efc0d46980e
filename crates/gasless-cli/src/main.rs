//! Gasless relay command line client.

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use clap::{Parser, Subcommand};
use gasless_chain::RpcChainClient;
use gasless_ops::{RelayOutcome, RelayPipeline, TargetCall};
use gasless_tx::{ConfirmationPolicy, RelayHttpClient};
use gasless_types::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::{load_account, require_api_token, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Relay a transaction through a GSN relay server without holding gas")]
struct Args {
    /// Network table entry to use (`test` or `production`)
    #[arg(short, long, env = "GASLESS_NETWORK", default_value = "test")]
    network: String,

    /// Path to the network table
    #[arg(short, long, env = "GASLESS_CONFIG", default_value = "gasless.toml")]
    config: PathBuf,

    /// Relay server API key
    #[arg(long, env = "RALLY_MOBILE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Wallet mnemonic; a new one is generated when unset
    #[arg(long, env = "WALLET_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    /// Relay server HTTP timeout in milliseconds
    #[arg(long, env = "GASLESS_RELAY_TIMEOUT_MS", default_value = "30000")]
    relay_timeout_ms: u64,

    /// Seconds between confirmation polls
    #[arg(long, env = "GASLESS_POLL_INTERVAL_SECS", default_value = "2")]
    poll_interval_secs: u64,

    /// Seconds to wait for confirmation before giving up
    #[arg(long, env = "GASLESS_MAX_WAIT_SECS", default_value = "300")]
    max_wait_secs: u64,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Claim from the network's token faucet (default)
    Claim,
    /// Relay arbitrary calldata
    Call {
        #[arg(long)]
        to: Address,
        #[arg(long, default_value = "0x")]
        data: Bytes,
    },
}

impl Action {
    fn target(&self) -> TargetCall {
        match self {
            Action::Claim => TargetCall::FaucetClaim,
            Action::Call { to, data } => TargetCall::Custom { to: *to, data: data.clone() },
        }
    }
}

async fn run(args: Args, cancel: CancellationToken) -> Result<RelayOutcome> {
    let api_token = require_api_token(args.api_token.as_deref())?;
    let network = Settings::load(&args.config)?.network(&args.network)?;
    info!(network = %network.name, chain_id = network.chain_id, "loaded network");

    let (account, generated) = load_account(args.mnemonic.as_deref())?;
    if let Some(phrase) = generated {
        println!("Generated a new wallet. Store this mnemonic now, it will not be shown again:");
        println!("{phrase}");
    }
    info!(address = %account.address(), "using account");

    let chain = Arc::new(RpcChainClient::new(&network.rpc_url)?);
    let relay = RelayHttpClient::new(&network.relay_url, &api_token, Some(args.relay_timeout_ms));
    let policy = ConfirmationPolicy {
        poll_interval: Duration::from_secs(args.poll_interval_secs),
        max_wait: Duration::from_secs(args.max_wait_secs),
    };

    let target = args.action.as_ref().map_or(TargetCall::FaucetClaim, Action::target);
    let pipeline = RelayPipeline::new(network, chain, relay, policy);
    pipeline.run(&account, &target, &cancel).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match run(args, cancel).await {
        Ok(outcome) => {
            println!("Relay request id: {}", outcome.relay_request_id);
            println!("Transaction: {}", outcome.tx_hash);
            if let Some(links) = outcome.links {
                println!("{}", links.tx);
                println!("{}", links.address);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = %e.kind(), error = ?e, "relay failed");
            if let Some(reason) = e.reason() {
                eprintln!("{}: {reason}", e.kind());
            }
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
