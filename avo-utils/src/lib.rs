//! Shared utility functions for the avocado toolkit crates.

/// Date utility functions
pub mod dates {
    use anyhow::anyhow;
    use chrono::NaiveDate;

    /// Date formats accepted in the dataset's `Date` column, tried in order.
    pub const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];

    /// Three-letter month labels, indexed by zero-based month.
    pub const MONTH_LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date in any of the [`ACCEPTED_FORMATS`].
    pub fn parse_flexible_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| anyhow!("unrecognized date '{}'", trimmed))
    }

    /// Label for a zero-based month, or `"?"` when out of range.
    pub fn month_label(month0: u32) -> &'static str {
        MONTH_LABELS.get(month0 as usize).copied().unwrap_or("?")
    }

}

/// Display formatting for prices and volumes.
pub mod numbers {
    /// Format a price in US dollars with two decimals, e.g. `$1.35`.
    pub fn format_price(price: f64) -> String {
        if price < 0.0 {
            format!("-${:.2}", -price)
        } else {
            format!("${:.2}", price)
        }
    }

    /// Format a number with thousands separators, rounded to the nearest integer.
    pub fn format_number(value: f64) -> String {
        let rounded = value.round();
        let digits = format!("{:.0}", rounded.abs());
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if rounded < 0.0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

}
