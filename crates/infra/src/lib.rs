//! Infrastructure layer: stores, view cache, config, and the invoice action
//! workflow that composes them.

pub mod actions;
pub mod config;
pub mod db;
pub mod invoice_store;
pub mod users;
pub mod views;

pub use actions::{ActionError, ActionOutcome, InvoiceActions, Operation};
pub use config::{ConfigError, Settings};
pub use invoice_store::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore, StoreError};
pub use users::PostgresUserDirectory;
pub use views::{InMemoryViewCache, ViewCache, ViewPath};
