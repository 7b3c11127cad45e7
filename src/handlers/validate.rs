//! Shared input-validation helpers. Validation fails closed: request
//! bodies are tagged structs with `deny_unknown_fields`, deserialized
//! explicitly so every shape failure maps to a 400 envelope.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Deserialize a request body into its typed input struct, mapping any
/// shape error (missing field, wrong type, unknown field) to a 400.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::validation_error(format!("Invalid request body: {e}"), None))
}

/// Accumulates per-field validation failures for one request.
#[derive(Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Fail with a 400 if any field error was recorded.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid input", Some(self.errors)))
        }
    }
}

/// Minimal shape check; uniqueness and deliverability are not our problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Case-fold an email for storage and lookup.
pub fn fold_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("u.ser+tag@sub.example.co"));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@examplecom"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn fold_lowercases_and_trims() {
        assert_eq!(fold_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        #[derive(Debug, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Input {
            #[allow(dead_code)]
            name: String,
        }

        let err = parse_body::<Input>(serde_json::json!({"name": "x", "ownerId": "sneaky"}))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
