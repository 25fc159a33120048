//! Invoice form actions (validated-mutation workflow).
//!
//! Every action follows the same pipeline:
//!
//! ```text
//! raw form input
//!   ↓
//! 1. Validate + coerce against the action's schema
//!   ↓ (fail: ActionOutcome::Render with field errors, no store access)
//! 2. Issue exactly one mutating statement against the store
//!   ↓ (fail: ActionError::Database, logged)
//! 3. Revalidate the invoice list view
//!   ↓
//! 4. NavigateTo the list (create/update) or Completed (delete)
//! ```
//!
//! There is no transaction around steps 1–3: validation finishes before the
//! single write is attempted, and nothing is retried.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use invoicedesk_core::{FormData, InvoiceId, validate};
use invoicedesk_invoicing::{
    ActionState, CreateInvoice, DeleteInvoice, Invoice, UpdateInvoice, form::FIELD_ID, state,
};

use crate::invoice_store::{InvoiceStore, StoreError};
use crate::views::{ViewCache, ViewPath};

/// What the caller should do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Re-render the form with this feedback.
    Render(ActionState),
    /// Leave the form and show `path`. Nothing else runs after this.
    NavigateTo(ViewPath),
    /// The mutation went through; stay on the current view.
    Completed,
}

/// Which mutation an action attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Generic, user-safe failure text.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Create => "Database Error: Failed to Create Invoice.",
            Operation::Update => "Database Error: Failed to Update Invoice.",
            Operation::Delete => "Database Error: Failed to Delete Invoice.",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

/// Failure after validation passed. Always fatal to the action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{}", .operation.failure_message())]
    Database {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl ActionError {
    pub fn operation(&self) -> Operation {
        match self {
            ActionError::Database { operation, .. } => *operation,
        }
    }

    /// Text safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        self.operation().failure_message()
    }

    /// The targeted row does not exist (update only).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ActionError::Database {
                source: StoreError::NotFound(_),
                ..
            }
        )
    }
}

/// The three invoice actions over an injected store and view cache.
pub struct InvoiceActions<S, V> {
    store: S,
    views: V,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<S, V> InvoiceActions<S, V>
where
    S: InvoiceStore,
    V: ViewCache,
{
    pub fn new(store: S, views: V) -> Self {
        Self {
            store,
            views,
            today: utc_today,
        }
    }

    /// Override the clock used to date new invoices.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    /// Create an invoice from the `customerId`/`amount`/`status` form.
    #[instrument(skip(self, form))]
    pub async fn create(&self, form: &FormData) -> Result<ActionOutcome, ActionError> {
        let fields = match validate(&CreateInvoice, form) {
            Ok(fields) => fields,
            Err(errors) => {
                debug!(fields = ?errors.fields().collect::<Vec<_>>(), "create rejected");
                return Ok(ActionOutcome::Render(ActionState::invalid(errors, state::CREATE_FAILED)));
            }
        };

        let invoice = Invoice::issue(InvoiceId::generate(), fields, (self.today)());
        self.store
            .insert(&invoice)
            .await
            .map_err(|source| database_error(Operation::Create, source))?;

        info!(invoice_id = %invoice.id, amount_cents = invoice.amount_cents, "invoice created");
        self.views.revalidate(&ViewPath::INVOICES);
        Ok(ActionOutcome::NavigateTo(ViewPath::INVOICES))
    }

    /// Update the invoice `id` from the edit form.
    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: &FormData) -> Result<ActionOutcome, ActionError> {
        let input = form.clone().with(FIELD_ID, id);
        let update = match validate(&UpdateInvoice, &input) {
            Ok(update) => update,
            Err(errors) => {
                debug!(fields = ?errors.fields().collect::<Vec<_>>(), "update rejected");
                return Ok(ActionOutcome::Render(ActionState::invalid(errors, state::UPDATE_FAILED)));
            }
        };

        self.store
            .update(&update.id, &update.fields)
            .await
            .map_err(|source| database_error(Operation::Update, source))?;

        info!(invoice_id = %update.id, "invoice updated");
        self.views.revalidate(&ViewPath::INVOICES);
        Ok(ActionOutcome::NavigateTo(ViewPath::INVOICES))
    }

    /// Delete the invoice `id`. Deleting an id that matches nothing succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<ActionOutcome, ActionError> {
        let input = FormData::new().with(FIELD_ID, id);
        let id = match validate(&DeleteInvoice, &input) {
            Ok(id) => id,
            Err(errors) => {
                return Ok(ActionOutcome::Render(ActionState::invalid(errors, state::DELETE_FAILED)));
            }
        };

        let removed = self
            .store
            .delete(&id)
            .await
            .map_err(|source| database_error(Operation::Delete, source))?;

        if removed {
            info!(invoice_id = %id, "invoice deleted");
        } else {
            debug!(invoice_id = %id, "delete matched no invoice");
        }
        self.views.revalidate(&ViewPath::INVOICES);
        Ok(ActionOutcome::Completed)
    }
}

fn database_error(operation: Operation, source: StoreError) -> ActionError {
    error!(%operation, error = %source, "Database Error");
    ActionError::Database { operation, source }
}
