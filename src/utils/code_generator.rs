use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;

const REFERENCE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Algeria keeps UTC+1 all year.
const ALGIERS_OFFSET_SECS: i32 = 3600;

/// Order number built from the Algiers calendar date and the tenant's order
/// counter, e.g. `ORD-250918-00042`.
pub fn generate_order_number(now: DateTime<Utc>, sequence: i64) -> String {
    let date = match FixedOffset::east_opt(ALGIERS_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).format("%y%m%d").to_string(),
        None => now.format("%y%m%d").to_string(),
    };
    format!("ORD-{date}-{sequence:05}")
}

/// Reference the merchant writes on the bank transfer / BaridiMob payment.
pub fn generate_payment_reference() -> String {
    let mut rng = rand::thread_rng();
    let code: String = (0..8)
        .map(|_| REFERENCE_CHARS[rng.gen_range(0..REFERENCE_CHARS.len())] as char)
        .collect();
    format!("PAY-{code}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_order_number() {
        let now = Utc.with_ymd_and_hms(2025, 9, 18, 10, 30, 0).unwrap();
        assert_eq!(generate_order_number(now, 42), "ORD-250918-00042");
        assert_eq!(generate_order_number(now, 123456), "ORD-250918-123456");
    }

    #[test]
    fn test_order_number_uses_algiers_date() {
        // 23:30 UTC is already 00:30 the next day in Algiers
        let late = Utc.with_ymd_and_hms(2025, 9, 18, 23, 30, 0).unwrap();
        assert_eq!(generate_order_number(late, 7), "ORD-250919-00007");
    }

    #[test]
    fn test_generate_payment_reference() {
        let reference = generate_payment_reference();
        assert_eq!(reference.len(), 12);
        assert!(reference.starts_with("PAY-"));
        assert!(reference[4..].bytes().all(|b| REFERENCE_CHARS.contains(&b)));
    }
}
