//! Gradebook CLI and grade service entry point.
//!
//! Binary name: `gradebook`
//!
//! Parses CLI arguments, loads configuration and the database, then
//! dispatches to the terminal client, the grade service or a utility command.

mod cli;
mod http;
mod server;
mod state;

use clap::Parser;
use clap_complete::generate;

use gradebook_infra::config::{default_config_path, load_config};
use gradebook_infra::discovery::consul::ConsulDiscoveryClient;
use gradebook_infra::filesystem::resolve_data_dir;
use gradebook_observe::tracing_setup::{
    init_tracing, otel_requested, shutdown_tracing, verbosity_directive,
};

use cli::serve::ServeOverrides;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = verbosity_directive(cli.verbose, cli.quiet);
    init_tracing(&filter, otel_requested())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need config or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "gradebook", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&data_dir));
    let config = load_config(&config_path).await?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            registry,
            name,
        } => {
            let state = AppState::init(&data_dir).await?;
            let overrides = ServeOverrides {
                host,
                port,
                registry,
                name,
            };
            cli::serve::serve(state, config, overrides, shutdown_signal()).await?;
        }

        Commands::Shell => {
            let state = AppState::init(&data_dir).await?;
            cli::shell::open(&state).await?;
        }

        Commands::Discover { name } => {
            let registry = ConsulDiscoveryClient::new(&config.discovery)?;
            let name = name.unwrap_or_else(|| config.service.name.clone());
            cli::discover::discover(&registry, &name, cli.json).await?;
        }

        Commands::Seed { password } => {
            let state = AppState::init(&data_dir).await?;
            cli::seed::seed(&state, &password, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
