//! Invoice record store boundary.
//!
//! One row per invoice, keyed by id. Every action issues at most one
//! mutating call against this trait.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;
pub use r#trait::{InvoiceStore, StoreError};
