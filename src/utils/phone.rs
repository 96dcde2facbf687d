use regex::Regex;
use std::sync::OnceLock;
use crate::error::{AppError, AppResult};

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0[567]\d{8}$").expect("valid phone regex"))
}

/// Normalises an Algerian phone number to the local `0XXXXXXXXX` form.
/// Accepts `+213`, `00213` and `213` prefixes, spaces, dots and dashes.
pub fn normalize_dz_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix("00213") {
        format!("0{}", rest)
    } else if digits.len() == 12 && digits.starts_with("213") {
        format!("0{}", &digits[3..])
    } else if digits.len() == 9 && !digits.starts_with('0') {
        format!("0{}", digits)
    } else {
        digits
    }
}

/// Validates an Algerian mobile number (Mobilis 06, Djezzy 07, Ooredoo 05)
/// and returns it normalised.
pub fn validate_dz_phone(phone: &str) -> AppResult<String> {
    let normalized = normalize_dz_phone(phone);

    if !mobile_regex().is_match(&normalized) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected an Algerian mobile number (05/06/07XXXXXXXX)".to_string()
        ));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dz_phone() {
        assert_eq!(validate_dz_phone("0551234567").unwrap(), "0551234567");
        assert_eq!(validate_dz_phone("+213 661 23 45 67").unwrap(), "0661234567");
        assert_eq!(validate_dz_phone("00213771234567").unwrap(), "0771234567");
        assert!(validate_dz_phone("0211234567").is_err()); // landline
        assert!(validate_dz_phone("055123456").is_err()); // too short
        assert!(validate_dz_phone("+12345678901").is_err());
    }

    #[test]
    fn test_normalize_dz_phone() {
        assert_eq!(normalize_dz_phone("0661-23-45-67"), "0661234567");
        assert_eq!(normalize_dz_phone("213661234567"), "0661234567");
        assert_eq!(normalize_dz_phone("661234567"), "0661234567");
    }
}
