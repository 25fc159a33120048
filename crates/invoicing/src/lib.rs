//! Invoicing domain module.
//!
//! This crate contains the invoice model, the form schemas that turn raw
//! submissions into normalized invoice fields, and the feedback state handed
//! back to forms. Pure domain logic (no IO, no HTTP, no storage).

pub mod form;
pub mod invoice;
pub mod state;

pub use form::{
    CreateInvoice, DeleteInvoice, InvoiceFields, InvoiceUpdate, UpdateInvoice, coerce_amount_cents,
    messages,
};
pub use invoice::{Invoice, InvoiceStatus};
pub use state::ActionState;
