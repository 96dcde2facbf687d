use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

/// Lowercases and validates an email address.
pub fn validate_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_ascii_lowercase();
    if email.len() > 255 || !email_regex().is_match(&email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(email)
}

/// Trims `value` and checks its character count is within `min..=max`.
pub fn require_text(field: &str, value: &str, min: usize, max: usize) -> AppResult<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Like [`require_text`] but empty input becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> AppResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text(field, v, 1, max).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Amina@Example.DZ ").unwrap(), "amina@example.dz");
        assert!(validate_email("amina@").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_require_text_counts_characters() {
        assert_eq!(require_text("name", "  متجر  ", 2, 10).unwrap(), "متجر");
        assert!(require_text("name", " ", 1, 10).is_err());
        assert!(require_text("name", "abcdef", 1, 5).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(optional_text("notes", Some("   "), 10).unwrap(), None);
        assert_eq!(optional_text("notes", Some(" hi "), 10).unwrap(), Some("hi".to_string()));
        assert!(optional_text("notes", Some("way too long"), 5).is_err());
    }
}
