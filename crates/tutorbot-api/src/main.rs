//! Tutorbot CLI and REST API entry point.
//!
//! Binary name: `tutorbot`
//!
//! Parses CLI arguments, loads configuration, initializes storage and
//! services, then runs the terminal chat, the history viewer, or the REST
//! API server.

use clap::Parser;
use clap_complete::generate;
use console::style;

use tutorbot_api::cli::{self, Cli, Commands};
use tutorbot_api::http;
use tutorbot_api::state::{AppState, Storage};
use tutorbot_infra::config::load_config;
use tutorbot_infra::filesystem::resolve_data_dir;
use tutorbot_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need nothing else
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tutorbot", &mut std::io::stdout());
        return Ok(());
    }

    // A missing .env is fine
    dotenv::dotenv().ok();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&resolve_data_dir()).await?;

    match cli.command {
        Commands::Chat => {
            let state = AppState::init(&config).await?;
            cli::chat::loop_runner::run_chat(&state).await?;
        }

        Commands::History { display_name } => {
            let storage = Storage::open(&config).await?;
            cli::history::show_history(&storage.session_controller(), &display_name, cli.json)
                .await?;
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(&config).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Tutorbot API listening on {}",
                    style("⚡").bold(),
                    style(format!("http://{addr}")).cyan()
                );
                println!("  {}", style("Press Ctrl+C to stop").dim());
            }

            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
