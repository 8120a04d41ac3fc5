//! Lenient numeric parsing for hand-typed values.
//!
//! Users paste figures like `1,234,567` or `12.5%`; thousands separators and
//! percent signs are stripped before parsing.

use treasury_common::error::AppError;

/// Parse a free-text number, ignoring `,` and `%`.
pub fn parse_number(raw: &str) -> Result<f64, AppError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    cleaned.trim().parse::<f64>().map_err(|_| AppError::Parse {
        input: raw.to_string(),
    })
}

/// Like [`parse_number`], but a blank entry means "not provided".
pub fn parse_optional(raw: &str) -> Result<Option<f64>, AppError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_number(raw).map(Some)
}

/// Form-field variant: blank or malformed text falls back to `default`.
pub fn parse_or_default(field: &str, raw: &str, default: f64) -> f64 {
    if raw.trim().is_empty() {
        return default;
    }
    match parse_number(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field, error = %e, default, "Using default for malformed field");
            default
        }
    }
}
