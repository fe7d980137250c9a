//! mtk-rank - Album ranking microservice
//!
//! Serves the ranked-list engine over HTTP. Startup order:
//! 1. Parse command line, load TOML bootstrap config
//! 2. Initialize tracing
//! 3. Resolve root folder, open (or create) the database
//! 4. Serve until Ctrl-C

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mtk_common::config::{self, TomlConfig, ROOT_FOLDER_ENV};
use mtk_common::db::init_database;
use mtk_rank::{build_router, load_debounce_ms, AppState, RankingEngine};
use tracing::{info, warn};

/// Command-line arguments for mtk-rank
#[derive(Parser, Debug)]
#[command(name = "mtk-rank")]
#[command(about = "Album ranking service for MTK")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "MTK_RANK_PORT")]
    port: Option<u16>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to TOML config file
    #[arg(short, long, env = "MTK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    let level = &toml_config.logging.level;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("mtk_rank={level},mtk_common={level},tower_http={level}").into()
            }),
        )
        .init();

    info!("Starting MTK ranking service (mtk-rank) v{}", env!("CARGO_PKG_VERSION"));
    match &toml_config.source {
        Some(path) => info!("Loaded config file: {}", path.display()),
        None => warn!("No config file found, using built-in defaults"),
    }

    let root_folder =
        config::resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let db_path = toml_config.database_path(&root_folder);
    let pool = init_database(&db_path, &toml_config.ranking)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let debounce_ms = load_debounce_ms(&pool, &toml_config.ranking).await;
    info!("Ranking debounce: {}ms", debounce_ms);

    let state = AppState::new(RankingEngine::new(pool), debounce_ms);
    let app = build_router(state);

    let port = args.port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("mtk-rank listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("mtk-rank stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
