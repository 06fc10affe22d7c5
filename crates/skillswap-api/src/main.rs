//! SkillSwap CLI and REST API entry point.
//!
//! Binary name: `skillswap`
//!
//! Parses CLI arguments, loads configuration, initializes tracing and the
//! database, then either serves the REST API or applies migrations and exits.

mod cli;
mod http;
mod state;

use clap::Parser;
use skillswap_infra::config::{default_config_path, load_config, resolve_data_dir};
use skillswap_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&data_dir));
    let config = load_config(&config_path).await;

    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: config.logging.json,
        otel: config.logging.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, config, &data_dir).await;
    shutdown_tracing();
    result
}

async fn run(
    cli: Cli,
    config: skillswap_types::config::AppConfig,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    let (host, port) = (config.server.host.clone(), config.server.port);

    // Opening the pool applies pending migrations
    let state = AppState::init(config, data_dir).await?;

    match cli.command {
        Commands::Migrate => {
            tracing::info!(data_dir = %data_dir.display(), "database migrations applied");
            if !cli.quiet {
                println!("Migrations applied.");
            }
        }

        Commands::Serve {
            port: port_override,
            host: host_override,
        } => {
            let addr = format!(
                "{}:{}",
                host_override.unwrap_or(host),
                port_override.unwrap_or(port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, "SkillSwap API listening");
            if !cli.quiet {
                println!("  SkillSwap API listening on http://{addr}");
                println!("  Press Ctrl+C to stop");
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
