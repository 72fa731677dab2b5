mod config;
mod http;

use clap::Parser;
use tickler_core::app::AppBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    // (A) repository・service・scheduler を組み立てて sweep を登録
    let app = AppBuilder::new()
        .reminder_interval(config.reminder_interval())
        .build()?;
    app.start().await?;

    // (B) HTTP server
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let local_addr = listener.local_addr()?;
    info!(
        reminder_interval_secs = config.reminder_interval_secs,
        "HTTP server listening on http://{local_addr}"
    );

    axum::serve(listener, http::router(&app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // (C) 新しい tick を止める（走行中の sweep は最後まで走る）
    app.shutdown().await;
    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down gracefully");
}
