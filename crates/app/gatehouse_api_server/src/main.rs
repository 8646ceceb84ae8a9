//! Gatehouse API server binary.
//!
//! Loads `.env`, connects to PostgreSQL, runs migrations, provisions the
//! bootstrap superadmin if configured, then serves the API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use gatehouse_api::config::ApiConfig;
use gatehouse_core::accounts::PgAccountRepository;
use gatehouse_core::bootstrap::ensure_superadmin;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "gatehouse_api_server", about = "Gatehouse API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3100")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/gatehouse"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,gatehouse_api=debug,gatehouse_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    // Refuse to start without an explicit signing secret.
    let config = ApiConfig::from_env(args.bind_addr, args.database_url)?;

    info!(bind_addr = %config.bind_addr, max_connections = args.max_connections, "starting gatehouse_api_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.pg_connection_url)
        .await?;

    info!("running database migrations");
    gatehouse_api::migrate(&pool).await?;

    let service = config
        .auth
        .build_service(Arc::new(PgAccountRepository::new(pool)))?;

    match &config.bootstrap {
        Some(bootstrap) => {
            ensure_superadmin(&service, bootstrap).await?;
        }
        None => info!("no bootstrap superadmin configured"),
    }

    let app = gatehouse_api::router(gatehouse_api::AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {e}");
            }
            info!("shutting down");
        })
        .await?;

    Ok(())
}
