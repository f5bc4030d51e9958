//! Form field validation
//!
//! Accumulates per-field errors instead of failing on the first one, so
//! admin forms can report everything wrong at once.

use chrono::NaiveDate;
use serde::Serialize;

/// One validation failure
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulating validator for one form submission
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Require a non-blank value
    pub fn required(&mut self, value: &str, field: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add_error(field, message);
            return false;
        }
        true
    }

    /// Loose email shape check: one `@`, non-empty local part, a dot in
    /// the domain.
    pub fn email(&mut self, value: &str, field: &str, message: &str) -> bool {
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
        if !valid {
            self.add_error(field, message);
        }
        valid
    }

    /// Require an http(s) URL
    pub fn url(&mut self, value: &str, field: &str, message: &str) -> bool {
        let valid = (value.starts_with("http://") && value.len() > 7)
            || (value.starts_with("https://") && value.len() > 8);
        if !valid {
            self.add_error(field, message);
        }
        valid
    }

    /// Require a YYYY-MM-DD date
    pub fn date(&mut self, value: &str, field: &str, message: &str) -> bool {
        if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
            self.add_error(field, message);
            return false;
        }
        true
    }

    pub fn min_length(&mut self, value: &str, min: usize, field: &str, message: &str) -> bool {
        if value.chars().count() < min {
            self.add_error(field, message);
            return false;
        }
        true
    }

    pub fn max_length(&mut self, value: &str, max: usize, field: &str, message: &str) -> bool {
        if value.chars().count() > max {
            self.add_error(field, message);
            return false;
        }
        true
    }

    /// Require the value to be one of `allowed`
    pub fn in_list(&mut self, value: &str, allowed: &[&str], field: &str, message: &str) -> bool {
        if !allowed.contains(&value) {
            self.add_error(field, message);
            return false;
        }
        true
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_accumulate() {
        let mut validator = FieldValidator::new();

        validator.required("", "title", "Title is required");
        validator.email("not-an-email", "email", "Invalid email");
        validator.date("2024-13-40", "start_date", "Invalid date");

        assert!(validator.has_errors());
        assert_eq!(validator.errors().len(), 3);
        assert_eq!(validator.errors()[0].field, "title");
    }

    #[test]
    fn test_valid_input_passes() {
        let mut validator = FieldValidator::new();

        assert!(validator.required("hello", "f", "m"));
        assert!(validator.email("jane@example.org", "f", "m"));
        assert!(validator.url("https://example.org", "f", "m"));
        assert!(validator.date("2024-01-15", "f", "m"));
        assert!(validator.min_length("abc", 3, "f", "m"));
        assert!(validator.max_length("abc", 3, "f", "m"));
        assert!(validator.in_list("current", &["current", "past"], "f", "m"));
        assert!(!validator.has_errors());
    }

    #[test]
    fn test_email_rejects_edge_shapes() {
        let mut validator = FieldValidator::new();

        assert!(!validator.email("@example.org", "f", "m"));
        assert!(!validator.email("jane@org", "f", "m"));
        assert!(!validator.email("jane@.org.", "f", "m"));
    }

    #[test]
    fn test_lengths_count_chars_not_bytes() {
        let mut validator = FieldValidator::new();

        assert!(validator.max_length("héllo", 5, "f", "m"));
        assert!(validator.min_length("héllo", 5, "f", "m"));
    }
}
