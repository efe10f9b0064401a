use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::RwLock;

/// Connect to PostgreSQL and run the pending migrations.
pub async fn configure_postgresql(database_url: &Secret<String>) -> color_eyre::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url.expose_secret())
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    Ok(pool)
}

pub fn get_redis_client(redis_hostname: &str) -> redis::RedisResult<redis::Client> {
    let redis_url = format!("redis://{redis_hostname}/");
    redis::Client::open(redis_url)
}

/// Open a shared Redis connection for the revoked-session store.
pub fn configure_redis(redis_hostname: &str) -> color_eyre::Result<Arc<RwLock<redis::Connection>>> {
    let client = get_redis_client(redis_hostname)?;
    let conn = client.get_connection()?;
    Ok(Arc::new(RwLock::new(conn)))
}
