use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceFields};

/// Invoice store operation error.
///
/// These are **infrastructure errors**; form validation never reaches the
/// store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matches the id (update only; delete treats this as a no-op).
    #[error("invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Insert collided with an existing key.
    #[error("invoice already exists: {0}")]
    Duplicate(InvoiceId),

    /// The store could not execute the statement.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded into an [`Invoice`].
    #[error("corrupt invoice row: {0}")]
    Corrupt(String),
}

/// Parameterized single-statement access to the `invoices` table.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new row.
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError>;

    /// Overwrite customer, amount and status of the row with `id`.
    ///
    /// Fails with [`StoreError::NotFound`] when no row matched.
    async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<(), StoreError>;

    /// Delete the row with `id`. Returns whether a row was removed; a
    /// missing row is not an error.
    async fn delete(&self, id: &InvoiceId) -> Result<bool, StoreError>;

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All invoices, newest date first.
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

#[async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<(), StoreError> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: &InvoiceId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list().await
    }
}
