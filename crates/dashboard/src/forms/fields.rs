//! Field-level validation errors.

use std::collections::BTreeMap;
use std::fmt;

/// Validation messages keyed by field name.
///
/// A field keeps only its first message, so the seller sees the most basic
/// problem (e.g. "Required field" before "Not a valid email address").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field unless it already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields with errors, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Collects field errors while a form checks its values.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` when `ok` is false.
    pub fn check(&mut self, field: &'static str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    /// Record a message unconditionally.
    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.add(field, message);
        self
    }

    /// Whether `field` already failed a check.
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    /// `Ok(())` if every check passed.
    ///
    /// # Errors
    ///
    /// Returns the collected `FieldErrors` otherwise.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Required field");
        errors.add("email", "Not a valid email address");
        assert_eq!(errors.get("email"), Some("Required field"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Required field");
        errors.add("price", "Must be a number");
        assert_eq!(errors.to_string(), "price: Must be a number; title: Required field");
    }

    #[test]
    fn test_validator_collects_failed_checks() {
        let mut validator = Validator::new();
        validator
            .check("name", true, "Required field")
            .check("phone", false, "Required field")
            .fail("avatar", "Profile image is required.");
        assert!(validator.has_error("phone"));
        assert!(!validator.has_error("name"));

        let errors = validator.finish().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["avatar", "phone"]);
    }

    #[test]
    fn test_validator_passes_when_clean() {
        let mut validator = Validator::new();
        validator.check("name", true, "Required field");
        assert!(validator.finish().is_ok());
    }
}
