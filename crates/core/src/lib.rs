//! `invoicedesk-core` — foundation building blocks shared by every layer.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! identifiers, the domain error model, raw form input, and the validation
//! capability that turns untyped input into normalized values.

pub mod error;
pub mod form;
pub mod id;
pub mod validation;

pub use error::DomainError;
pub use form::FormData;
pub use id::{CustomerId, InvoiceId, UserId};
pub use validation::{FieldErrors, Schema, ValidationResult, validate};
