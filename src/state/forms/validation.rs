//! Field validation and per-field error slots

use super::field::FormField;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Outcome of validating a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }
}

/// `local@domain.tld`: ASCII only, no whitespace, a dot somewhere after the `@`
pub fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && EMAIL_PATTERN.is_match(email)
}

/// Check one field against its presence and type rules
pub fn validate_field(field: &FormField) -> ValidationResult {
    if field.required && field.is_empty() {
        return ValidationResult::invalid(REQUIRED_MESSAGE);
    }
    let text = field.as_text();
    if field.is_email() && !text.is_empty() && !is_valid_email(text) {
        return ValidationResult::invalid(EMAIL_MESSAGE);
    }
    ValidationResult::ok()
}

/// Error message slots, one per field name.
///
/// A slot holds at most one message, so re-validating an unchanged field
/// replaces rather than stacks its error.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    slots: HashMap<String, String>,
}

impl FieldErrors {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, message: impl Into<String>) {
        self.slots.insert(name.to_string(), message.into());
    }

    pub fn clear(&mut self, name: &str) -> bool {
        self.slots.remove(name).is_some()
    }

    /// Attach or remove the message for a field based on a validation result
    pub fn apply(&mut self, name: &str, result: &ValidationResult) {
        match &result.message {
            Some(message) if !result.valid => self.set(name, message.clone()),
            _ => {
                self.clear(name);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Validate every required field of a step in declaration order.
///
/// All fields are checked (no short-circuit) so each invalid one gets its
/// message; the step is valid iff all of them are.
pub fn validate_step(fields: &[FormField], errors: &mut FieldErrors) -> bool {
    let mut all_valid = true;
    for field in fields.iter().filter(|f| f.required) {
        let result = validate_field(field);
        errors.apply(&field.name, &result);
        all_valid &= result.valid;
    }
    all_valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::{ChoiceOption, FieldKind};

    fn text(name: &str, value: &str, required: bool) -> FormField {
        let mut field = FormField::new(name, name, FieldKind::Text);
        field.required = required;
        field.set_text(value.to_string());
        field
    }

    fn email(value: &str, required: bool) -> FormField {
        let mut field = FormField::new("email", "Email", FieldKind::Email);
        field.required = required;
        field.set_text(value.to_string());
        field
    }

    mod email_shape {
        use super::*;

        #[test]
        fn test_accepts_simple_address() {
            assert!(is_valid_email("jane@example.com"));
            assert!(is_valid_email("a.b+c@mail.example.co"));
        }

        #[test]
        fn test_rejects_missing_dot_after_at() {
            assert!(!is_valid_email("jane@example"));
        }

        #[test]
        fn test_rejects_whitespace_and_extra_at() {
            assert!(!is_valid_email("ja ne@example.com"));
            assert!(!is_valid_email("jane@@example.com"));
            assert!(!is_valid_email(" jane@example.com"));
        }

        #[test]
        fn test_rejects_non_ascii() {
            assert!(!is_valid_email("jané@example.com"));
        }
    }

    mod validate_field {
        use super::*;

        #[test]
        fn test_required_empty_is_invalid() {
            let result = validate_field(&text("name", "  ", true));
            assert_eq!(result, ValidationResult::invalid(REQUIRED_MESSAGE));
        }

        #[test]
        fn test_optional_empty_is_valid() {
            assert!(validate_field(&text("name", "", false)).valid);
        }

        #[test]
        fn test_bad_email_gets_email_message() {
            let result = validate_field(&email("nope", true));
            assert_eq!(result.message.as_deref(), Some(EMAIL_MESSAGE));
        }

        #[test]
        fn test_optional_bad_email_is_still_checked() {
            assert!(!validate_field(&email("nope", false)).valid);
            assert!(validate_field(&email("", false)).valid);
        }

        #[test]
        fn test_required_checkbox_group_needs_one_choice() {
            let mut field = FormField::new("features", "Features", FieldKind::Checkbox)
                .with_options(vec![ChoiceOption::new("seo", "SEO")])
                .required();
            assert!(!validate_field(&field).valid);
            field.toggle_option();
            assert!(validate_field(&field).valid);
        }
    }

    mod validate_step {
        use super::*;

        #[test]
        fn test_each_invalid_field_gets_one_message() {
            let fields = vec![text("name", "", true), email("bad", true), text("company", "Acme", true)];
            let mut errors = FieldErrors::default();

            assert!(!validate_step(&fields, &mut errors));
            assert_eq!(errors.len(), 2);
            assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
            assert_eq!(errors.get("email"), Some(EMAIL_MESSAGE));
            assert_eq!(errors.get("company"), None);
        }

        #[test]
        fn test_revalidating_does_not_duplicate() {
            let fields = vec![text("name", "", true)];
            let mut errors = FieldErrors::default();
            validate_step(&fields, &mut errors);
            validate_step(&fields, &mut errors);
            assert_eq!(errors.len(), 1);
        }

        #[test]
        fn test_fixed_field_clears_its_slot() {
            let mut fields = vec![text("name", "", true)];
            let mut errors = FieldErrors::default();
            validate_step(&fields, &mut errors);

            fields[0].set_text("Jane".to_string());
            assert!(validate_step(&fields, &mut errors));
            assert!(errors.is_empty());
        }

        #[test]
        fn test_optional_fields_do_not_gate() {
            let fields = vec![text("name", "Jane", true), email("bad", false)];
            let mut errors = FieldErrors::default();
            assert!(validate_step(&fields, &mut errors));
        }
    }
}
