// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Chameleon Client
//!
//! Entry point for the `chameleon-client` binary. Parses CLI arguments,
//! loads configuration, opens the staged transaction store, and either runs
//! one lifecycle command or serves the REST API.
//!
//! Configuration is layered: built-in defaults, then the TOML file given
//! with `--config`, then individual flags and `CHAMELEON_*` variables.
//!
//! stdout carries only command results (hashes, account JSON). Logs go to
//! stderr.

mod api;
mod cli;
mod fee;
mod logging;
mod metrics;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;

use chameleon_protocol::account::AccountService;
use chameleon_protocol::config::ClientConfig;
use chameleon_protocol::crypto::signatures::Signature;
use chameleon_protocol::lifecycle::{Prepared, RedactionEngine, SignatureCoordinator, TxPreparer};
use chameleon_protocol::network::{Dispatcher, RequestBridge, TcpTransport, Transport};
use chameleon_protocol::resolver::resolve_private_key;
use chameleon_protocol::storage::TxStore;
use chameleon_protocol::transaction::TxHash;

use cli::{AccountCommand, ChameleonCli, Commands, GlobalArgs, SignOpts};
use metrics::ClientMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ChameleonCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format);

    let config = load_config(&cli.global)?;
    let client = Client::open(&config)?;

    let result = run(&client, &config, cli.command).await;
    client.close();
    result
}

/// Defaults, then the config file, then flag overrides.
fn load_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let mut config = match &global.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(db_path) = &global.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(bootstrap) = &global.bootstrap {
        config.bootstrap_endpoint = bootstrap.clone();
    }
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Component wiring
// ---------------------------------------------------------------------------

/// The lifecycle components, wired over one store and one transport.
struct Client {
    store: TxStore,
    preparer: TxPreparer,
    coordinator: SignatureCoordinator,
    bridge: RequestBridge,
    accounts: AccountService,
}

impl Client {
    fn open(config: &ClientConfig) -> Result<Self> {
        let store = TxStore::open(&config.db_path)
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
        tracing::info!(
            path = %config.db_path.display(),
            staged = store.transaction_count(),
            "database opened"
        );

        let transport: Arc<dyn Transport> = Arc::new(TcpTransport::new(config.connect_timeout()));
        let redaction = RedactionEngine::new(store.clone());
        let preparer = TxPreparer::new(store.clone(), redaction);
        let coordinator = SignatureCoordinator::new(
            store.clone(),
            Dispatcher::new(transport.clone(), config.bootstrap_endpoint.clone()),
        );
        let bridge = RequestBridge::spawn(
            transport,
            config.bootstrap_endpoint.clone(),
            config.request_timeout(),
        );
        let accounts = AccountService::new(bridge.clone());

        Ok(Self {
            store,
            preparer,
            coordinator,
            bridge,
            accounts,
        })
    }

    /// Print the hash for external signing, or sign in-process and submit
    /// when `--sign-with` was given.
    async fn finish(&self, prepared: Prepared, sign: &SignOpts, cosigner: &str) -> Result<()> {
        let hash = prepared.hash;
        let Some(key_ref) = &sign.sign_with else {
            tracing::info!(hash = %hash, kind = %prepared.tx.kind(), "staged, sign the hash to submit");
            println!("{hash}");
            return Ok(());
        };

        let key = resolve_private_key(key_ref)?.context("--sign-with resolved to no key")?;
        let cosigner = resolve_private_key(cosigner)?;
        self.coordinator
            .sign_locally(&hash, &key, cosigner.as_ref())?;
        self.coordinator
            .submit(&hash)
            .await
            .with_context(|| format!("failed to submit {hash}"))?;
        println!("{hash}");
        Ok(())
    }

    fn close(&self) {
        self.bridge.shutdown();
        if let Err(e) = self.store.flush() {
            tracing::error!(error = %e, "failed to flush database");
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run(client: &Client, config: &ClientConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Account(AccountCommand::Create(cmd)) => {
            let prepared = client.preparer.prepare_account(&cmd.to_args())?;
            client.finish(prepared, &cmd.sign, "").await
        }
        Commands::Account(AccountCommand::Add(cmd)) => {
            let prepared = client.preparer.prepare_add_account(&cmd.to_args())?;
            client.finish(prepared, &cmd.sign, "").await
        }
        Commands::Account(AccountCommand::Check(cmd)) => check_account(client, &cmd).await,
        Commands::Funds(cmd) => {
            let prepared = client.preparer.prepare_funds(&cmd.to_args())?;
            client.finish(prepared, &cmd.sign, &cmd.multisig).await
        }
        Commands::Network(cmd) => {
            let all = cmd.to_args();
            if all.is_empty() {
                bail!(
                    "no configuration option given; use one of --set-block-size, \
                     --set-difficulty-interval, --set-minimum-fee, --set-block-interval, \
                     --set-block-reward"
                );
            }
            for args in &all {
                let prepared = client.preparer.prepare_config(args)?;
                client.finish(prepared, &cmd.sign, "").await?;
            }
            Ok(())
        }
        Commands::Staking(cmd) => {
            let prepared = client.preparer.prepare_stake(&cmd.to_args())?;
            client.finish(prepared, &cmd.cmd().sign, "").await
        }
        Commands::Update(cmd) => {
            let prepared = client.preparer.prepare_update(&cmd.to_args())?;
            client.finish(prepared, &cmd.sign, "").await
        }
        Commands::Delete(cmd) => {
            let prepared = client.preparer.prepare_delete(&cmd.to_args())?;
            client.finish(prepared, &cmd.sign, "").await
        }
        Commands::Sign(cmd) => {
            let hash = TxHash::from_hex(cmd.hash.trim())?;
            let primary = Signature::from_hex(cmd.signature.trim())?;
            let cosigner = cmd
                .cosignature
                .as_deref()
                .map(|s| Signature::from_hex(s.trim()))
                .transpose()?;
            client
                .coordinator
                .attach_and_submit(&hash, primary, cosigner)
                .await
                .with_context(|| format!("failed to submit {hash}"))?;
            println!("Tx successfully sent to network.");
            Ok(())
        }
        Commands::Submit(cmd) => {
            let hash = TxHash::from_hex(cmd.hash.trim())?;
            client
                .coordinator
                .submit(&hash)
                .await
                .with_context(|| format!("failed to submit {hash}"))?;
            println!("Tx successfully sent to network.");
            Ok(())
        }
        Commands::Rest(cmd) => serve(client, config, cmd.port.unwrap_or(config.rest_port)).await,
    }
}

async fn check_account(client: &Client, cmd: &cli::CheckAccountCmd) -> Result<()> {
    let Some(view) = client.accounts.check(&cmd.to_args()).await? else {
        println!("Account does not exist.");
        return Ok(());
    };

    let acc = &view.account;
    let recent: Vec<String> = view.recent_txs.iter().map(TxHash::to_hex).collect();
    let json = serde_json::json!({
        "address": acc.address.to_hex(),
        "balance": acc.balance,
        "tx_count": acc.tx_count,
        "is_root": acc.is_root,
        "is_staking": acc.is_staking,
        "recent_txs": recent,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&json).context("failed to render account")?
    );
    Ok(())
}

async fn serve(client: &Client, config: &ClientConfig, port: u16) -> Result<()> {
    let metrics = ClientMetrics::new().context("failed to register metrics")?;
    let state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: client.store.clone(),
        preparer: client.preparer.clone(),
        coordinator: client.coordinator.clone(),
        accounts: client.accounts.clone(),
        metrics,
    };

    let router = api::create_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind REST listener on {addr}"))?;
    tracing::info!(
        %addr,
        bootstrap = %config.bootstrap_endpoint,
        "REST server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server error")?;

    tracing::info!("REST server stopped");
    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}
