// src/main.rs
use dotenvy::dotenv;
use homeledger::database::db::{connection, migrate, queries};
use homeledger::backend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pool = connection::get_db_pool().await?;
    migrate::run_migrations(&pool).await?;
    queries::seed_fixed_categories(&pool).await?;

    backend::run_server(pool).await?;
    Ok(())
}
