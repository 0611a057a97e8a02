use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::env;

pub async fn get_db_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    // mode=rwc creates the file on first run
    let db_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://homeledger.db?mode=rwc".to_string());

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
}
