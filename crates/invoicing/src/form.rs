//! Invoice form schemas.
//!
//! Each schema reads the raw [`FormData`] a form submitted, checks every
//! field, and either yields normalized values or the full set of per-field
//! messages. Field names match what the forms submit (`customerId`,
//! `amount`, `status`, `id`).

use invoicedesk_core::{CustomerId, FieldErrors, FormData, InvoiceId, Schema, ValidationResult};

use crate::invoice::InvoiceStatus;

/// User-facing validation messages.
pub mod messages {
    pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
    pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than 0";
    pub const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a number.";
    pub const AMOUNT_TOO_LARGE: &str = "Amount is too large.";
    pub const STATUS_INVALID: &str = "Please select a valid status.";
    pub const REQUIRED: &str = "Required";
}

pub const FIELD_ID: &str = "id";
pub const FIELD_CUSTOMER_ID: &str = "customerId";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_STATUS: &str = "status";

/// Normalized, validated invoice columns shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    pub customer_id: CustomerId,
    /// round(amount × 100); always positive after validation.
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// Validated update: which row, and its new columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceUpdate {
    pub id: InvoiceId,
    pub fields: InvoiceFields,
}

/// Schema for the create form (`customerId`, `amount`, `status`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateInvoice;

/// Schema for the edit form: the create fields plus `id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateInvoice;

/// Schema for the delete button: a single required `id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteInvoice;

impl Schema for CreateInvoice {
    type Output = InvoiceFields;

    fn validate(&self, input: &FormData) -> ValidationResult<InvoiceFields> {
        let mut errors = FieldErrors::new();
        let fields = invoice_fields(input, &mut errors);
        errors.finish(|| fields)
    }
}

impl Schema for UpdateInvoice {
    type Output = InvoiceUpdate;

    fn validate(&self, input: &FormData) -> ValidationResult<InvoiceUpdate> {
        let mut errors = FieldErrors::new();
        let id = errors.check(FIELD_ID, required_id(input));
        let fields = invoice_fields(input, &mut errors);
        errors.finish(|| Some(InvoiceUpdate { id: id?, fields: fields? }))
    }
}

impl Schema for DeleteInvoice {
    type Output = InvoiceId;

    fn validate(&self, input: &FormData) -> ValidationResult<InvoiceId> {
        let mut errors = FieldErrors::new();
        let id = errors.check(FIELD_ID, required_id(input));
        errors.finish(|| id)
    }
}

fn invoice_fields(input: &FormData, errors: &mut FieldErrors) -> Option<InvoiceFields> {
    // Every rule runs so the form can flag all offending fields at once.
    let customer_id = errors.check(
        FIELD_CUSTOMER_ID,
        input
            .get(FIELD_CUSTOMER_ID)
            .and_then(|raw| raw.parse::<CustomerId>().ok())
            .ok_or_else(|| messages::CUSTOMER_REQUIRED.to_string()),
    );
    let amount_cents = errors.check(
        FIELD_AMOUNT,
        coerce_amount_cents(input.get(FIELD_AMOUNT)).map_err(str::to_string),
    );
    let status = errors.check(
        FIELD_STATUS,
        input
            .get(FIELD_STATUS)
            .and_then(|raw| raw.parse::<InvoiceStatus>().ok())
            .ok_or_else(|| messages::STATUS_INVALID.to_string()),
    );

    Some(InvoiceFields {
        customer_id: customer_id?,
        amount_cents: amount_cents?,
        status: status?,
    })
}

fn required_id(input: &FormData) -> Result<InvoiceId, String> {
    input
        .get(FIELD_ID)
        .and_then(|raw| raw.parse::<InvoiceId>().ok())
        .ok_or_else(|| messages::REQUIRED.to_string())
}

/// Coerce the raw `amount` text to a positive number of cents.
///
/// Missing or blank text coerces to 0 and so fails the positivity rule.
/// The result is `round(amount × 100)`, which absorbs binary drift such as
/// `19.99 × 100 = 1998.999…`.
pub fn coerce_amount_cents(raw: Option<&str>) -> Result<i64, &'static str> {
    let text = raw.map(str::trim).unwrap_or_default();
    let amount = if text.is_empty() {
        0.0
    } else {
        text.parse::<f64>()
            .map_err(|_| messages::AMOUNT_NOT_A_NUMBER)?
    };
    if !amount.is_finite() {
        return Err(messages::AMOUNT_NOT_A_NUMBER);
    }
    if amount <= 0.0 {
        return Err(messages::AMOUNT_NOT_POSITIVE);
    }

    let cents = (amount * 100.0).round();
    if cents >= i64::MAX as f64 {
        return Err(messages::AMOUNT_TOO_LARGE);
    }
    Ok(cents as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicedesk_core::validate;
    use proptest::prelude::*;

    fn create_form(customer: &str, amount: &str, status: &str) -> FormData {
        FormData::new()
            .with(FIELD_CUSTOMER_ID, customer)
            .with(FIELD_AMOUNT, amount)
            .with(FIELD_STATUS, status)
    }

    #[test]
    fn create_normalizes_valid_input() {
        let fields = validate(&CreateInvoice, &create_form("c1", "50", "pending")).unwrap();
        assert_eq!(fields.customer_id.as_str(), "c1");
        assert_eq!(fields.amount_cents, 5000);
        assert_eq!(fields.status, InvoiceStatus::Pending);
    }

    #[test]
    fn currency_amounts_round_to_exact_cents() {
        assert_eq!(coerce_amount_cents(Some("19.99")), Ok(1999));
        assert_eq!(coerce_amount_cents(Some("0.29")), Ok(29));
        assert_eq!(coerce_amount_cents(Some(" 1.005 ")), Ok(100));
        assert_eq!(coerce_amount_cents(Some("1e2")), Ok(10000));
    }

    #[test]
    fn non_positive_and_blank_amounts_are_rejected() {
        for raw in [Some("0"), Some("-3"), Some("  "), None] {
            assert_eq!(coerce_amount_cents(raw), Err(messages::AMOUNT_NOT_POSITIVE), "{raw:?}");
        }
    }

    #[test]
    fn non_numeric_amounts_are_rejected() {
        for raw in ["abc", "NaN", "inf", "12,50"] {
            assert_eq!(coerce_amount_cents(Some(raw)), Err(messages::AMOUNT_NOT_A_NUMBER), "{raw}");
        }
        assert_eq!(coerce_amount_cents(Some("1e300")), Err(messages::AMOUNT_TOO_LARGE));
    }

    #[test]
    fn create_collects_every_field_error() {
        let errors = validate(&CreateInvoice, &FormData::new().with(FIELD_STATUS, "overdue"))
            .unwrap_err();

        assert_eq!(errors.messages(FIELD_CUSTOMER_ID), [messages::CUSTOMER_REQUIRED]);
        assert_eq!(errors.messages(FIELD_AMOUNT), [messages::AMOUNT_NOT_POSITIVE]);
        assert_eq!(errors.messages(FIELD_STATUS), [messages::STATUS_INVALID]);
        assert!(!errors.contains(FIELD_ID));
    }

    #[test]
    fn blank_customer_is_missing() {
        let errors = validate(&CreateInvoice, &create_form("   ", "10", "paid")).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), [FIELD_CUSTOMER_ID]);
    }

    #[test]
    fn update_requires_id_in_addition_to_fields() {
        let errors = validate(&UpdateInvoice, &create_form("c1", "10", "paid")).unwrap_err();
        assert_eq!(errors.messages(FIELD_ID), [messages::REQUIRED]);

        let update = validate(
            &UpdateInvoice,
            &create_form("c1", "10", "paid").with(FIELD_ID, "inv-9"),
        )
        .unwrap();
        assert_eq!(update.id.as_str(), "inv-9");
        assert_eq!(update.fields.amount_cents, 1000);
        assert_eq!(update.fields.status, InvoiceStatus::Paid);
    }

    #[test]
    fn delete_only_needs_an_id() {
        let id = validate(&DeleteInvoice, &FormData::new().with(FIELD_ID, "does-not-exist")).unwrap();
        assert_eq!(id.as_str(), "does-not-exist");

        let errors = validate(&DeleteInvoice, &FormData::new()).unwrap_err();
        assert_eq!(errors.messages(FIELD_ID), [messages::REQUIRED]);
    }

    proptest! {
        #[test]
        fn cents_match_two_decimal_input(units in 0u32..1_000_000, hundredths in 0u32..100) {
            prop_assume!(units > 0 || hundredths > 0);
            let raw = format!("{units}.{hundredths:02}");
            let expected = i64::from(units) * 100 + i64::from(hundredths);
            prop_assert_eq!(coerce_amount_cents(Some(&raw)), Ok(expected));
        }

        #[test]
        fn status_outside_enum_never_validates(status in "[a-zA-Z]{1,10}") {
            prop_assume!(status != "pending" && status != "paid");
            let errors = validate(&CreateInvoice, &create_form("c1", "10", &status)).unwrap_err();
            prop_assert_eq!(errors.messages(FIELD_STATUS), [messages::STATUS_INVALID]);
        }
    }
}
