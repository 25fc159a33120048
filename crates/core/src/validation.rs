//! Validation capability: untyped input in, normalized value or per-field
//! errors out.
//!
//! Any schema mechanism can sit behind [`Schema`]; callers only ever see
//! [`ValidationResult`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::FormData;

/// Per-field error messages, keyed by the submitted field name.
///
/// Messages for a field keep the order in which the rules reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages reported for `field` (empty when the field passed).
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Record the error of a field-level check, passing the value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(msg) => {
                self.add(field, msg);
                None
            }
        }
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> ValidationResult<T> {
        if !self.is_empty() {
            return Err(self);
        }
        match value() {
            Some(v) => Ok(v),
            // A rule yielded no value without recording why.
            None => Err(self),
        }
    }
}

/// Outcome of validating raw input: normalized data or field errors.
pub type ValidationResult<T> = Result<T, FieldErrors>;

/// A validation/coercion rule set for one kind of form.
pub trait Schema {
    type Output;

    fn validate(&self, input: &FormData) -> ValidationResult<Self::Output>;
}

/// Run `schema` against `input`.
pub fn validate<S: Schema + ?Sized>(schema: &S, input: &FormData) -> ValidationResult<S::Output> {
    schema.validate(input)
}
