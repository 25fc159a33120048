use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedesk_core::{CustomerId, DomainError, InvoiceId};

use crate::form::InvoiceFields;

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    /// Exact, case-sensitive match on the stored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(DomainError::validation(format!(
                "unknown invoice status: {other:?}"
            ))),
        }
    }
}

/// An invoice row as the store holds it.
///
/// Invariant: `amount_cents` is non-negative and is the validated amount
/// multiplied by 100, rounded to the nearest cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    /// Calendar date the invoice was created (serialized `YYYY-MM-DD`).
    pub date: NaiveDate,
}

impl Invoice {
    /// Build the row a create action inserts.
    pub fn issue(id: InvoiceId, fields: InvoiceFields, date: NaiveDate) -> Self {
        Self {
            id,
            customer_id: fields.customer_id,
            amount_cents: fields.amount_cents,
            status: fields.status,
            date,
        }
    }

    /// Overwrite the editable columns; id and date stay untouched.
    pub fn apply(&mut self, fields: InvoiceFields) {
        self.customer_id = fields.customer_id;
        self.amount_cents = fields.amount_cents;
        self.status = fields.status;
    }
}
