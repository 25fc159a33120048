//! Postgres connection pool wiring.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Settings;

/// Open the process-wide pool. Returns `None` when no database is configured.
pub async fn connect(settings: &Settings) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = settings.database_url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .connect(url)
        .await?;
    info!(max_connections = settings.database_max_connections, "connected to postgres");
    Ok(Some(pool))
}
