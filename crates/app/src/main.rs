use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clientele_app::auth::session::SessionStore;
use clientele_app::config::Config;
use clientele_app::ops;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clientele=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::from_env();
    tracing::info!(environment = %config.environment, "Loaded configuration");
    if let Some(dsn) = &config.observability_dsn {
        tracing::info!(%dsn, "Observability sink configured");
    }

    // --- Database ---
    let pool = clientele_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    clientele_db::health_check(&pool).await.context("Database health check failed")?;
    tracing::info!("Database health check passed");

    clientele_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Bootstrap ---
    if let Some(admin) = ops::users::ensure_bootstrap_admin(&pool)
        .await
        .context("Failed to seed the bootstrap admin")?
    {
        tracing::info!(username = %admin.username, "Bootstrap admin account seeded");
    }

    // --- Session store ---
    let session_path =
        config.session_file.clone().unwrap_or_else(SessionStore::default_path);
    let store = SessionStore::new(session_path);
    match store.current() {
        Some(session) => {
            tracing::info!(username = %session.username, role = %session.role, "Live session found")
        }
        None => tracing::info!("No live session"),
    }

    tracing::info!("Ready");
    Ok(())
}
