//! Input validation helpers
//!
//! Each helper returns `SharedError::ValidationError` naming the field that
//! failed, so handlers can forward it with `?`.

use crate::shared::SharedError;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;

/// Validate username format
///
/// Letters, digits and `@ . + - _`, up to 150 characters.
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    if username.trim().is_empty() {
        return Err(SharedError::validation("username", "This field may not be blank."));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(SharedError::validation(
            "username",
            "Ensure this field has no more than 150 characters.",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(SharedError::validation(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let invalid = || SharedError::validation("email", "Enter a valid email address.");

    if email.trim().is_empty() {
        return Err(SharedError::validation("email", "This field may not be blank."));
    }
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.contains('@') {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid());
    }
    Ok(())
}

/// Require a non-blank string of at most `max_len` characters
pub fn validate_text(field: &str, value: &str, max_len: Option<usize>) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "This field may not be blank."));
    }
    if let Some(max_len) = max_len {
        if value.chars().count() > max_len {
            return Err(SharedError::validation(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            ));
        }
    }
    Ok(())
}
