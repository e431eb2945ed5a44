//! Form field validation helpers

/// Why a field value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
}

impl FieldError {
    /// User-facing message for the error
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required => "This field is required.",
            FieldError::InvalidEmail => "Please enter a valid email address.",
        }
    }
}

/// Input type of a field, as far as validation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
}

/// Validate one field value. Empty optional fields are fine; email format is
/// only checked when a value is present.
pub fn validate_field(kind: FieldKind, value: &str, required: bool) -> Result<(), FieldError> {
    let value = value.trim();
    if required && value.is_empty() {
        return Err(FieldError::Required);
    }
    if kind == FieldKind::Email && !value.is_empty() && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

/// Minimal email shape check: one `@`, non-empty local part, a dot inside the
/// domain, and no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("guest@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn required_fields_reject_blank_values() {
        assert_eq!(
            validate_field(FieldKind::Text, "   ", true),
            Err(FieldError::Required)
        );
        assert_eq!(validate_field(FieldKind::Text, "", false), Ok(()));
    }

    #[test]
    fn optional_email_is_only_checked_when_present() {
        assert_eq!(validate_field(FieldKind::Email, "", false), Ok(()));
        assert_eq!(
            validate_field(FieldKind::Email, "nope", false),
            Err(FieldError::InvalidEmail)
        );
        assert_eq!(validate_field(FieldKind::Email, "a@b.co", true), Ok(()));
    }
}
