//! Local credential checks, run before any request leaves the process.

use crate::error::ValidationError;

/// Check that both fields are filled in and the email looks like an email.
///
/// No password policy is applied beyond non-emptiness.
///
/// # Errors
///
/// Returns [`ValidationError::MissingFields`] if either field is empty, or
/// [`ValidationError::InvalidEmail`] if the email is malformed.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Basic `local@domain.tld` shape check.
///
/// ASCII only, no whitespace, exactly one `@` with a non-empty local part,
/// and a domain containing a `.` that has at least one character on each
/// side.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if !email.is_ascii() || email.chars().any(|c| c.is_ascii_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
