/// Format a price in New Taiwan dollars with thousands separators.
/// Sub-dollar precision is dropped; listed prices are whole dollars.
pub fn format_price(price: f64) -> String {
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if whole < 0 {
        format!("-NT${}", grouped)
    } else {
        format!("NT${}", grouped)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a server timestamp to a readable date.
/// Handles RFC 3339 and the backend's naive `YYYY-MM-DDTHH:MM:SS` form.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(36900.0), "NT$36,900");
        assert_eq!(format_price(990.0), "NT$990");
        assert_eq!(format_price(1299900.0), "NT$1,299,900");
        assert_eq!(format_price(0.0), "NT$0");
        assert_eq!(format_price(36899.6), "NT$36,900"); // rounds
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-08-01T09:30:00"), "Aug 01, 2026");
        assert_eq!(format_date("2026-08-01T09:30:00+08:00"), "Aug 01, 2026");
        assert_eq!(format_date("2026-08-01"), "2026-08-01");
        assert_eq!(format_date("n/a"), "n/a");
    }
}
