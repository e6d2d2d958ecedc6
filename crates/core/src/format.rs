//! en-US display formatting for amounts and dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format an amount as US dollars: `$1,234.50`, `-$3.00`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount < 0.0 { "-$∞".to_string() } else { "$∞".to_string() };
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format an ISO date or timestamp as a US short date (`3/7/2024`).
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, and RFC 3339 timestamps.
pub fn format_date(raw: &str) -> Result<String, chrono::ParseError> {
    let raw = raw.trim();
    let date = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date,
        Err(date_err) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                dt.date_naive()
            } else {
                ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
                    .ok_or(date_err)?
            }
        }
    };
    Ok(date.format("%-m/%-d/%Y").to_string())
}
