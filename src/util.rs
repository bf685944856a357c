// Utility helpers for cell parsing, basic statistics and display formatting.
//
// Cells arrive as text; everything that turns text into a number lives here so
// the normalizer and the aggregator can share one definition of "numeric".
use num_format::{Locale, ToFormattedString};

/// Parse a CSV cell into `f64`.
///
/// - Trims surrounding whitespace.
/// - Returns `None` for empty cells.
/// - Returns `None` for anything `f64::from_str` rejects, and for `NaN`/infinite
///   results so a stray `"nan"` never poisons a column sum.
/// - Thousands separators are not accepted: `"1,234"` is malformed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice instead of NaN.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places with locale-aware thousands separators,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render a percentage the way the dashboard tiles show it: one decimal.
pub fn format_percent(p: f64) -> String {
    format!("{}%", format_number(p, 1))
}
