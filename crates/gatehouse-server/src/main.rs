//! Gatehouse server entry point.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gatehouse_core::Config;
use gatehouse_server::{app, AppState};
use tokio::net::TcpListener;

/// Gatehouse - session and role gatekeeping for an Appwrite-backed app
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Serve the Gatehouse auth, session and page routes", long_about = None)]
struct Args {
    /// Configuration file path (TOML); environment variables override it
    #[arg(short, long, env = "GATEHOUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding `app.bind_addr`
    #[arg(short, long)]
    bind: Option<String>,

    /// Print the effective configuration (API key redacted) and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gatehouse=debug".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = args.bind {
        config.app.bind_addr = bind;
    }

    if args.print_config {
        let mut shown = config.clone();
        if !shown.appwrite.api_key.is_empty() {
            shown.appwrite.api_key = "<redacted>".to_string();
        }
        print!("{}", shown.to_toml_string()?);
        return Ok(());
    }

    let address = config.app.bind_addr.clone();
    tracing::info!(
        app_url = %config.app.url,
        environment = ?config.app.environment,
        endpoint = %config.appwrite.endpoint,
        "starting gatehouse"
    );

    let state = AppState::new(config)?;
    let router = app(state)?;

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
