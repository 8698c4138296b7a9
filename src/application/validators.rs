use std::collections::HashMap;

use validator::ValidateEmail;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Per-field validation messages, keyed by form field name.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Canonical form used for lookups and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates the signup form. Returns an empty map when every field is acceptable.
pub fn validate_signup(name: &str, email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if name.trim().chars().count() < MIN_NAME_LEN {
        errors
            .entry("name".into())
            .or_default()
            .push(format!("Name must be at least {MIN_NAME_LEN} characters"));
    }

    if !is_valid_email(email) {
        errors
            .entry("email".into())
            .or_default()
            .push("Invalid email address".into());
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        errors
            .entry("password".into())
            .or_default()
            .push(format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }

    errors
}
