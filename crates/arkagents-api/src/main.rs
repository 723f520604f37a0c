//! ArkAgents CLI and REST API entry point.
//!
//! Binary name: `arkagents`
//!
//! Parses CLI arguments, loads configuration, initializes storage and
//! services, then dispatches to the status command or starts the REST server.

mod cli;
mod http;
mod state;

use clap::Parser;

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;
use arkagents_infra::config::{load_app_config, resolve_data_dir};

use cli::{Cli, Commands};
use state::{AppState, InMemoryState, SqliteState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let config = load_app_config(&data_dir).await;

    arkagents_observe::tracing_setup::init_tracing(
        cli.log_filter(),
        cli.otel || config.telemetry.otel_stdout,
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Status => {
            let state = SqliteState::init(&config, &data_dir).await?;
            cli::status::status(&state, &data_dir, cli.json).await
        }

        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");

            if in_memory {
                tracing::warn!("Using in-memory storage; agents and messages are lost on exit");
                serve(InMemoryState::init_in_memory(&config), &addr, cli.quiet).await
            } else {
                let state = SqliteState::init(&config, &data_dir).await?;
                serve(state, &addr, cli.quiet).await
            }
        }
    };

    arkagents_observe::tracing_setup::shutdown_tracing();
    result
}

/// Bind the listener and serve the API until Ctrl+C or SIGTERM.
async fn serve<A, M>(state: AppState<A, M>, addr: &str, quiet: bool) -> anyhow::Result<()>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    if !state.provider_key_set {
        tracing::warn!("No provider API key set; chat requests will fail until one is configured");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ArkAgents API listening");

    if !quiet {
        println!(
            "  {} ArkAgents API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
