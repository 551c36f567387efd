//! User constants and validation.

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Auth provider recorded when none is supplied.
pub const DEFAULT_AUTH_PROVIDER: &str = "google";

/// Validate an email address: non-empty, within the length limit, and of the
/// rough `local@domain` shape.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email cannot be empty".to_string());
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "email exceeds maximum length of {MAX_EMAIL_LENGTH} characters"
        ));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("Invalid email address '{email}'")),
    }
}
