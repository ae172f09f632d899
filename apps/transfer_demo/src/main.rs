use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{address::abbreviate_address, load_settings, WalletClient};
use shared::domain::{NetworkId, TransferRequest};
use tracing::info;
use wallet_adapter::SimulatedWallet;

/// Runs one connect → transfer → status cycle against the simulated wallet.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    network: Option<NetworkId>,
    #[arg(long)]
    recipient: String,
    #[arg(long)]
    amount: String,
    #[arg(
        long,
        default_value = "aleo1demo0000000000000000000000000000000000000000000000000000000"
    )]
    sender: String,
    /// Number of status refreshes to perform after submission.
    #[arg(long, default_value_t = 2)]
    polls: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = load_settings();

    let wallet = Arc::new(
        SimulatedWallet::new(&args.sender).with_status_sequence(["Pending", "Finalized"]),
    );
    let client = WalletClient::start(wallet, &settings);
    info!(app = %settings.app_name, "starting transfer demo");

    let connection = client.connection();
    connection.open_network_picker().await;
    if let Some(network) = args.network {
        connection.choose_network(network).await?;
    }
    let session = connection
        .confirm_connect()
        .await
        .context("failed to connect wallet")?;
    println!(
        "Connected {} on {} as {}",
        session.wallet_name,
        session.network,
        session
            .public_key
            .as_deref()
            .map(abbreviate_address)
            .unwrap_or_default()
    );

    let request = TransferRequest::new(args.recipient, args.amount);
    let id = client
        .transfers()
        .submit(&request)
        .await
        .context("transfer was not submitted")?;
    println!("Transaction ID: {id}");

    for _ in 0..args.polls {
        match client.transfers().refresh_status().await {
            Ok(status) => println!("Status: {status}"),
            Err(err) => println!("{}", err.message),
        }
    }

    if let Some(record) = client.transfers().record().await {
        println!("Final record: {}", serde_json::to_string_pretty(&record)?);
    }

    connection.disconnect().await?;
    Ok(())
}
