//! Field validators shared by the services.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const NAME_MAX_LEN: usize = 120;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+(?::\d{1,5})?(?:[/?#][^\s]*)?$")
        .expect("url regex")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]{5,19}$").expect("phone regex"));

/// Trimmed, non-blank, at most [`NAME_MAX_LEN`] characters.
pub fn validate_name(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be blank")));
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {NAME_MAX_LEN} characters"
        )));
    }
    Ok(value.to_string())
}

pub fn is_valid_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://shop.example.co.uk/path?x=1#top"));
        assert!(is_valid_url("https://instagram.com/my-store"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("https://localhost"));
        assert!(!is_valid_url("https://exa mple.com"));
    }

    #[test]
    fn emails_and_phones() {
        assert!(is_valid_email("owner@shop.io"));
        assert!(!is_valid_email("owner@shop"));
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("name", "  Shop ").unwrap(), "Shop");
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(121)).is_err());
    }
}
