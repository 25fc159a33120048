use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use invoicedesk_core::InvoiceId;
use invoicedesk_invoicing::{Invoice, InvoiceFields};

use super::r#trait::{InvoiceStore, StoreError};

/// In-memory invoice store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    rows: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("invoice table lock poisoned".to_string())
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.contains_key(&invoice.id) {
            return Err(StoreError::Duplicate(invoice.id.clone()));
        }
        rows.insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        row.apply(fields.clone());
        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        Ok(rows.remove(id).is_some())
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut all: Vec<Invoice> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(all)
    }
}
