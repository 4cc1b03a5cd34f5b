//! latsim server
//!
//! - Simulated endpoints: /ping/:id/status, /ping/:id/info
//! - Request interceptor: per-request counter + latency histogram
//! - Scrape endpoint: /metrics on the main listener or on its own
//! - Graceful shutdown on Ctrl+C / SIGTERM

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use latsim_core::error::Result;
use latsim_server::{app_state::AppState, config::Cli, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(code = e.code().as_str(), error = %e, "latsim-server failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = cli.load()?;
    let listen = cfg.server.listen_addr()?;
    let metrics_listen = cfg.metrics.listen_addr()?;

    let state = AppState::new(cfg)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let listener = TcpListener::bind(listen).await?;
    tracing::info!(%listen, metrics_path = %state.cfg().metrics.path, "latsim-server starting");
    let app = axum::serve(listener, router::build_router(state.clone()))
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));

    match metrics_listen {
        None => app.await?,
        Some(addr) => {
            let metrics_listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "metrics listener starting");
            let metrics = axum::serve(metrics_listener, router::build_metrics_router(state))
                .with_graceful_shutdown(wait_for_shutdown(shutdown_rx));

            tokio::try_join!(async move { app.await }, async move { metrics.await })?;
        }
    }

    tracing::info!("latsim-server stopped");
    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
