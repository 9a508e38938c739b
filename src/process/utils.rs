use once_cell::sync::Lazy;
use regex::Regex;

static SALARY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d,]+\.?\d*").expect("salary token regex should compile"));

/// Flag cells read as set when they spell `true`, `yes` or `1`.
pub fn is_truthy(raw: &str) -> bool {
    let s = raw.trim().to_ascii_lowercase();
    matches!(s.as_str(), "true" | "yes" | "1")
}

/// First run of digits/commas (with an optional decimal part) as a number.
/// `"$50,000 - $70,000"` → `50000.0`. Anything unreadable counts as zero.
pub fn extract_salary(raw: &str) -> f64 {
    SALARY_TOKEN
        .find(raw)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Leading integer of `s` (after whitespace and an optional sign), zero if none.
/// `"100000+"` → `100000`, `"abc"` → `0`.
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|v| sign * v)
        .unwrap_or(0)
}

/// `50000.0` → `"50,000"`, `1234.5` → `"1,234.5"`; at most three decimals.
pub fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
