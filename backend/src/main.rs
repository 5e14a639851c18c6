//! Account API entry-point: loads settings, prepares the user store and
//! serves the HTTP API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_api::inbound::http::health::HealthState;
use user_api::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use user_api::settings::ServerSettings;

use server::{ServerConfig, create_server};

async fn connect_store(settings: &ServerSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }

    let pool_config =
        PoolConfig::new(database_url).with_max_size(settings.database_max_connections());
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(database_url) = settings.database_url() {
        let pool = connect_store(&settings, database_url).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "user API listening");
    server.await.wrap_err("server terminated with an error")
}
