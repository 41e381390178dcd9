//! Connections - unified CLI
//!
//! Serves puzzles over REST, seeds and fills the store, and plays in the
//! terminal against a local database or a running server.

#![warn(missing_docs)]

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use connections::{
    NewPuzzle, PuzzleDefinition, PuzzleRepository, PuzzleService, PuzzleStore,
    RestPuzzleClient, ServerConfig, create_router, run_tui,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => {
            init_tracing();
            let mut config = config;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(db_path) = db_path {
                config = config.with_db_path(db_path);
            }
            run_server(config).await
        }
        Command::Seed { reset, db_path } => {
            init_tracing();
            seed(db_path.unwrap_or_else(|| config.db_path().clone()), reset)
        }
        Command::Create {
            file,
            creator,
            db_path,
            server_url,
        } => {
            init_tracing();
            let store = open_store(&config, db_path, server_url)?;
            create(store, file, creator).await
        }
        Command::Play {
            db_path,
            server_url,
            log_file,
        } => {
            init_file_tracing(&log_file)?;
            let store = open_store(&config, db_path, server_url)?;
            run_tui(store).await
        }
    }
}

/// Logs to stderr, `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Logs to a file so the terminal UI is left alone.
fn init_file_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Picks the REST client when a server URL is given, the local file otherwise.
#[instrument(skip(config))]
fn open_store(
    config: &ServerConfig,
    db_path: Option<String>,
    server_url: Option<String>,
) -> Result<Arc<dyn PuzzleStore>> {
    if let Some(url) = server_url {
        info!(server_url = %url, "Using remote puzzle store");
        return Ok(Arc::new(RestPuzzleClient::new(&url)));
    }

    let db_path = db_path.unwrap_or_else(|| config.db_path().clone());
    let repository = PuzzleRepository::new(db_path)?;
    repository.run_migrations()?;
    info!(db_path = %repository.db_path(), "Using local puzzle store");
    Ok(Arc::new(PuzzleService::new(repository)))
}

/// Runs the REST server until Ctrl+C or SIGTERM.
#[instrument(skip(config), fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let repository = PuzzleRepository::new(config.db_path().clone())?;
    repository.run_migrations()?;

    let app = create_router(repository);
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address()))?;
    info!(address = %listener.local_addr()?, "Puzzle server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Creates the schema and installs `john_doe` with the "Tech Terms" puzzle.
#[instrument]
fn seed(db_path: String, reset: bool) -> Result<()> {
    let repository = PuzzleRepository::new(db_path)?;
    if reset {
        repository.reset()?;
    } else {
        repository.run_migrations()?;
    }

    let service = PuzzleService::new(repository);
    let user = service.get_or_create_user("john_doe")?;
    let sample = NewPuzzle::tech_terms(*user.id());

    let already_seeded = service
        .repository()
        .list_games()?
        .iter()
        .any(|g| g.title == sample.title && g.creator_id == *user.id());
    if already_seeded {
        warn!(title = %sample.title, "Sample puzzle already present");
        return Ok(());
    }

    let created = service.repository().create_game(&sample)?;
    info!(game_id = created.id, title = %created.title, "Sample puzzle installed");
    println!("Seeded '{}' (game {}) by {}", created.title, created.id, user.username());
    Ok(())
}

/// Reads a TOML puzzle file and stores it under `creator`.
#[instrument(skip(store))]
async fn create(store: Arc<dyn PuzzleStore>, file: PathBuf, creator: String) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let definition = PuzzleDefinition::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let user = store.sign_in(&creator).await?;
    let request = definition.into_request(*user.id());
    request.validate()?;

    let created = store.create_puzzle(&request).await?;
    info!(game_id = created.id, "Puzzle stored");
    println!("Created '{}' (game {})", created.title, created.id);
    Ok(())
}

/// Completes when Ctrl+C or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
