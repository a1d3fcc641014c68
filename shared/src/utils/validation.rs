//! Email validation, normalization and masking utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

/// Lowercases and trims an email address.
///
/// Emails are unique case-insensitively across the platform; every lookup
/// goes through this normalization first.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks that a string is shaped like an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Masks an email address for log output, keeping the first character of the
/// local part and the full domain.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***".to_string(),
    }
}
