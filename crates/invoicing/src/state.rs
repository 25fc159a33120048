//! Feedback handed back to a form after a submission that did not navigate.

use serde::{Deserialize, Serialize};

use invoicedesk_core::FieldErrors;

/// Summary messages shown above a form whose fields failed validation.
pub const CREATE_FAILED: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_FAILED: &str = "Missing Fields. Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Missing Fields. Failed to Delete Invoice.";

/// Per-invocation form feedback. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionState {
    /// Inline field errors plus a top-level summary.
    pub fn invalid(errors: FieldErrors, summary: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(summary.into()),
        }
    }

    /// A top-level message with no field errors.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parts_are_omitted_from_json() {
        let json = serde_json::to_value(ActionState::message("Invalid credentials.")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Invalid credentials."}));

        let mut errors = FieldErrors::new();
        errors.add("amount", "Amount must be greater than 0");
        let state = ActionState::invalid(errors, CREATE_FAILED);
        assert!(state.has_errors());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["errors"]["amount"][0], "Amount must be greater than 0");
        assert_eq!(json["message"], CREATE_FAILED);
    }
}
