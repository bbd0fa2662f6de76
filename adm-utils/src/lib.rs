//! Shared utility functions for ADM crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, Timelike, Weekday};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Short English weekday name ("Mon", "Tue", ...) used as chart axis labels.
    pub fn short_weekday(date: &NaiveDate) -> &'static str {
        match date.weekday() {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Two-digit "HH:MM" clock label for notifications and chat messages.
    pub fn clock_label<T: Timelike>(time: &T) -> String {
        format!("{:02}:{:02}", time.hour(), time.minute())
    }

    /// Export filename stamped with the given date, e.g.
    /// `campaign_performance_2024-06-15.csv`.
    pub fn dated_filename(stem: &str, date: &NaiveDate, extension: &str) -> String {
        format!("{}_{}.{}", stem, format_date(date), extension)
    }

}

/// Number formatting
pub mod numbers {
    /// Render an integer with comma thousands separators ("1,234,567").
    pub fn with_thousands(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// Round to a fixed number of decimal places.
    pub fn round_to(value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }

}
