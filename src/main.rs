use std::net::SocketAddr;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jwtblog::auth::{revocation, TokenKeys};
use jwtblog::config::{Cli, Config};
use jwtblog::state::{AppState, DbPool};
use jwtblog::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Connect to the store; an unreachable store at boot is fatal
    let pool = match connect_store(&config) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Store unreachable: {:#}", e);
            std::process::exit(1);
        }
    };
    db::run_migrations(&pool)?;

    if config.auth.compact_revoked_on_startup {
        let conn = pool.get()?;
        let purged = revocation::purge_expired(&conn, Utc::now().timestamp())?;
        tracing::info!(
            "Compacted revocation list: {} expired entries removed, {} remain",
            purged,
            revocation::count(&conn)?
        );
    }

    let keys = TokenKeys::from_config(config.jwt_secret(), &config.auth);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState::new(pool, config, keys));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn connect_store(config: &Config) -> anyhow::Result<DbPool> {
    let db_path = config.db_path();
    tracing::info!("Database: {}", db_path.display());
    let pool = db::create_pool(&db_path)?;
    db::probe(&pool)?;
    Ok(pool)
}
