use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
    // an in-memory database lives only as long as its connection
    let pool_options = if is_in_memory(database_url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    info!(database_url, "connected to SQLite");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("running database migrations");
    sqlx::migrate!().run(pool).await?;
    info!("migrations completed");
    Ok(())
}

/// Fresh private database with the schema applied.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = create_pool("sqlite::memory:", 1).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
