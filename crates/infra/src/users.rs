//! Postgres-backed user directory for the credentials provider.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use invoicedesk_auth::{DirectoryError, PasswordDigest, UserDirectory, UserRecord};
use invoicedesk_core::UserId;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id       UUID PRIMARY KEY,
        name     TEXT NOT NULL,
        email    TEXT NOT NULL UNIQUE,
        salt     TEXT NOT NULL,
        password TEXT NOT NULL
    )
"#;

/// Reads `users(id, name, email, salt, password)`; `password` holds the
/// hex digest, never the plain text.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DirectoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    salt: String,
    password: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            password: PasswordDigest {
                salt: row.salt,
                hash: row.password,
            },
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, salt, password
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(row.map(UserRecord::from))
    }
}
