use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

/// Labels that belong to the platform itself and can never be a store.
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www", "api", "admin", "app", "dashboard", "mail", "smtp", "static", "cdn", "assets",
    "help", "support", "status", "blog", "docs",
];

fn subdomain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{1,61}[a-z0-9])$").expect("valid subdomain regex"))
}

/// Strips the port, a trailing dot and lowercases a `Host` header value.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

/// Extracts the store subdomain from a `Host` header.
///
/// Only `<label>.<root_domain>` yields a subdomain; the bare root domain,
/// nested labels, reserved labels and unrelated hosts yield `None`.
pub fn extract_subdomain(host: &str, root_domain: &str) -> Option<String> {
    let host = normalize_host(host);
    let root = normalize_host(root_domain);

    let prefix = host.strip_suffix(&root)?.strip_suffix('.')?;
    if prefix.is_empty() || prefix.contains('.') {
        return None;
    }
    if RESERVED_SUBDOMAINS.contains(&prefix) {
        return None;
    }
    Some(prefix.to_string())
}

/// Checks a subdomain requested at registration and returns it lowercased.
pub fn validate_subdomain(subdomain: &str) -> AppResult<String> {
    let subdomain = subdomain.trim().to_ascii_lowercase();

    if !subdomain_regex().is_match(&subdomain) {
        return Err(AppError::ValidationError(
            "Subdomain must be 3-63 characters of lowercase letters, digits or '-', and cannot start or end with '-'".to_string(),
        ));
    }
    if subdomain.contains("--") {
        return Err(AppError::ValidationError(
            "Subdomain cannot contain consecutive '-'".to_string(),
        ));
    }
    if RESERVED_SUBDOMAINS.contains(&subdomain.as_str()) {
        return Err(AppError::ValidationError(format!(
            "Subdomain '{subdomain}' is reserved"
        )));
    }

    Ok(subdomain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        assert_eq!(extract_subdomain("amina.souk.dz", "souk.dz").as_deref(), Some("amina"));
        assert_eq!(extract_subdomain("Amina.Souk.DZ:443", "souk.dz").as_deref(), Some("amina"));
        assert_eq!(extract_subdomain("amina.souk.dz.", "souk.dz").as_deref(), Some("amina"));
        assert_eq!(extract_subdomain("shop.localhost:3000", "localhost").as_deref(), Some("shop"));
    }

    #[test]
    fn test_extract_subdomain_rejects_platform_hosts() {
        assert_eq!(extract_subdomain("souk.dz", "souk.dz"), None);
        assert_eq!(extract_subdomain("www.souk.dz", "souk.dz"), None);
        assert_eq!(extract_subdomain("a.b.souk.dz", "souk.dz"), None);
        assert_eq!(extract_subdomain("amina.example.com", "souk.dz"), None);
        assert_eq!(extract_subdomain("evilsouk.dz", "souk.dz"), None);
        assert_eq!(extract_subdomain("127.0.0.1:8080", "souk.dz"), None);
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Shop.Souk.dz:8080"), "shop.souk.dz");
        assert_eq!(normalize_host("souk.dz"), "souk.dz");
    }

    #[test]
    fn test_validate_subdomain() {
        assert_eq!(validate_subdomain("Boutique-Amina").unwrap(), "boutique-amina");
        assert!(validate_subdomain("ab").is_err());
        assert!(validate_subdomain("-amina").is_err());
        assert!(validate_subdomain("amina-").is_err());
        assert!(validate_subdomain("ami--na").is_err());
        assert!(validate_subdomain("ami_na").is_err());
        assert!(validate_subdomain("admin").is_err());
        assert!(validate_subdomain("www").is_err());
    }
}
