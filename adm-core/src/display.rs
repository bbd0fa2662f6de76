//! Canonical conversion between numeric values and their display strings.
//!
//! Campaign rows keep their numeric fields as the strings shown in the table.
//! Sorting and spreadsheet export both recover numbers through
//! [`parse_display_value`], so the two can never disagree about a value.

/// Unit decoration applied to a formatted number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayUnit {
    /// Bare number: "48213"
    Plain,
    /// Percent suffix: "3.45%"
    Percent,
    /// Currency prefix: "$1234"
    Currency,
    /// Multiplier suffix: "2.9x"
    Multiplier,
}

/// Characters stripped before a display string is parsed as a number.
const DECORATIONS: [char; 4] = ['$', '%', 'x', ','];

/// Format `value` with a fixed number of decimals and the unit's decoration.
pub fn format_display_value(value: f64, unit: DisplayUnit, decimals: usize) -> String {
    let number = format!("{:.*}", decimals, value);
    match unit {
        DisplayUnit::Plain => number,
        DisplayUnit::Percent => format!("{}%", number),
        DisplayUnit::Currency => format!("${}", number),
        DisplayUnit::Multiplier => format!("{}x", number),
    }
}

/// Recover the number behind a display string.
///
/// Strips `$`, `%`, `x` and thousands separators, then parses what is left.
/// Returns `None` for text that is not a finite number (campaign names,
/// statuses, empty strings).
pub fn parse_display_value(s: &str) -> Option<f64> {
    let stripped: String = s
        .trim()
        .chars()
        .filter(|c| !DECORATIONS.contains(c))
        .collect();
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}
