//! Number formatting shared by the table and card renderers.

use treasury_common::types::Coverage;

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
pub fn usd(value: f64) -> String {
    format!("${}", group_thousands(&format!("{value:.0}")))
}

/// Percentage with a fixed number of decimals, e.g. `20.00%`.
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Fixed-decimal number.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Coverage duration; an unreachable one prints as `inf`.
pub fn coverage(value: Coverage, decimals: usize) -> String {
    fixed(value.as_f64(), decimals)
}

/// Insert `,` every three digits of the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        // inf / NaN
        return formatted.to_string();
    }

    let mut grouped = String::with_capacity(rest.len() + rest.len() / 3);
    for (i, ch) in rest.chars().enumerate() {
        if i > 0 && (rest.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
