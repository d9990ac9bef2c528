//! Display helpers shared by the list and dashboard views (en-US style).

use chrono::NaiveDate;

/// Group the integer part with commas and keep at most three fraction
/// digits, trailing zeros trimmed: `1234.5` -> `1,234.5`.
pub fn format_number(value: f64) -> String {
    let scaled = (value.abs() * 1000.0).round() as i128;
    let whole = scaled / 1000;
    let frac = scaled % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac != 0 {
        let frac = format!("{frac:03}");
        grouped.push('.');
        grouped.push_str(frac.trim_end_matches('0'));
    }
    if value < 0.0 && scaled != 0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_number(value))
}

/// `$0` for a missing or zero amount, like the tables show.
pub fn format_optional_currency(value: Option<f64>) -> String {
    format_currency(value.unwrap_or(0.0))
}

/// `2024-03-01` -> `March 2024`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// `2024-03-09` -> `3/9/2024`; unparsable input is returned as-is.
pub fn short_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Empty strings render as `N/A`.
pub fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(1234.5), "$1,234.5");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
        assert_eq!(format_currency(12.3456), "$12.346");
    }

    #[test]
    fn negative_numbers_keep_sign() {
        assert_eq!(format_number(-1500.25), "-1,500.25");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn months_and_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(month_label(date), "January 2024");
        assert_eq!(short_date("2024-03-09"), "3/9/2024");
        assert_eq!(short_date("soon"), "soon");
    }

    #[test]
    fn missing_values() {
        assert_eq!(format_optional_currency(None), "$0");
        assert_eq!(or_na(""), "N/A");
        assert_eq!(or_na("IT"), "IT");
    }
}
