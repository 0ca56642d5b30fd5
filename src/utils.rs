use chrono::{Datelike, Month, NaiveDate};

pub const MONTHS_PER_YEAR: usize = 12;

/// Full English name of a 0-based month index (0 = January).
/// Out-of-range indices map to "Unknown" rather than panicking.
pub fn month_name(month_index: u32) -> &'static str {
    month_index
        .checked_add(1)
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Returns the 0-based calendar month of a date.
/// This is the index space used by every 12-element curve in the crate.
pub fn month_index_of(date: NaiveDate) -> u32 {
    date.month0()
}

/// Rounds half-up, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Divides only when the denominator is strictly positive, otherwise yields 0.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Formats a value as whole dollars with thousands separators, e.g. `-$12,345`.
/// Non-finite values render as "n/a".
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = round_half_up(value);
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Joins month indices into a readable list of names ("June, July and August").
pub fn join_month_names(months: &[u32]) -> String {
    let names: Vec<&str> = months.iter().map(|&m| month_name(m)).collect();
    match names.len() {
        0 => String::new(),
        1 => names[0].to_string(),
        n => format!("{} and {}", names[..n - 1].join(", "), names[n - 1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(4), "May");
        assert_eq!(month_name(11), "December");
        assert_eq!(month_name(12), "Unknown");
    }

    #[test]
    fn test_month_index_of() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 15).unwrap();
        assert_eq!(month_index_of(date), 8);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(3464.5), 3465.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_ratio_or_zero_guards_denominator() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, -5.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(450.0), "$450");
        assert_eq!(format_currency(1234567.4), "$1,234,567");
        assert_eq!(format_currency(-12000.0), "-$12,000");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_format_currency_beyond_integer_range() {
        let huge = format_currency(1e25);
        assert!(huge.starts_with("$10,000,000,000,000,000,"));
        assert_eq!(huge.matches(',').count(), 8);
        assert_eq!(format_currency(f64::INFINITY), "n/a");
        assert_eq!(format_currency(f64::NAN), "n/a");
    }

    #[test]
    fn test_join_month_names() {
        assert_eq!(join_month_names(&[]), "");
        assert_eq!(join_month_names(&[10]), "November");
        assert_eq!(join_month_names(&[5, 6, 7]), "June, July and August");
    }
}
