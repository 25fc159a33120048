//! Postgres-backed invoice store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / other | N/A | `Backend` |
//!
//! Ids are stored as `UUID`. An id that does not parse as a UUID cannot
//! match any row, so update reports `NotFound` and delete is a no-op without
//! touching the database.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceFields};

use super::r#trait::{InvoiceStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id          UUID PRIMARY KEY,
        customer_id TEXT NOT NULL,
        amount      BIGINT NOT NULL CHECK (amount >= 0),
        status      TEXT NOT NULL CHECK (status IN ('pending', 'paid')),
        date        DATE NOT NULL
    )
"#;

/// Postgres-backed invoice store.
///
/// Uses the SQLx connection pool (`PgPool` is internally reference counted
/// and `Send + Sync`). Every statement binds its parameters.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `invoices` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id), err)]
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let key = Uuid::parse_str(invoice.id.as_str())
            .map_err(|e| StoreError::Backend(format!("invoice id is not a uuid: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(key)
        .bind(invoice.customer_id.as_str())
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(invoice.id.clone())
            } else {
                map_sqlx_error("insert", e)
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id), err)]
    async fn update(&self, id: &InvoiceId, changes: &InvoiceFields) -> Result<(), StoreError> {
        let Some(key) = parse_key(id) else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $2, amount = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(key)
        .bind(changes.customer_id.as_str())
        .bind(changes.amount_cents)
        .bind(changes.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: &InvoiceId) -> Result<bool, StoreError> {
        let Some(key) = parse_key(id) else {
            debug!("id is not a uuid; nothing to delete");
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let Some(key) = parse_key(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.map(Invoice::try_from).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.into_iter().map(Invoice::try_from).collect()
    }
}

fn parse_key(id: &InvoiceId) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

// SQLx row types

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: Uuid,
    customer_id: String,
    amount: i64,
    status: String,
    date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let key = row.id;
        let corrupt = |what: String| StoreError::Corrupt(format!("invoice {key}: {what}"));
        Ok(Invoice {
            id: key
                .to_string()
                .parse()
                .map_err(|e| corrupt(format!("{e}")))?,
            customer_id: row
                .customer_id
                .parse()
                .map_err(|e| corrupt(format!("{e}")))?,
            amount_cents: row.amount,
            status: row.status.parse().map_err(|e| corrupt(format!("{e}")))?,
            date: row.date,
        })
    }
}
