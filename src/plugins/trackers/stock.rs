use regex::Regex;

use crate::utils::error::{AppError, Result};
use crate::utils::text::ascii_digits;

/// Reads an integer stock count from the first capture of `pattern`.
///
/// No match is `Ok(None)`. A match whose capture is missing or not an
/// integer is an error: the page changed in a way the job cannot handle.
/// `\d` in the pattern matches digits of any script, so the capture is
/// converted to ASCII digits before parsing.
pub fn parse_stock_number(text: &str, pattern: &Regex) -> Result<Option<i64>> {
    let Some(captures) = pattern.captures(text) else {
        return Ok(None);
    };

    let raw = captures.get(1).map(|m| m.as_str()).ok_or_else(|| AppError::Parse {
        message: format!("stock pattern '{}' matched without capturing a count", pattern),
    })?;

    ascii_digits(raw.trim())
        .parse::<i64>()
        .map(Some)
        .map_err(|e| AppError::Parse {
            message: format!("stock count '{}' is not an integer: {}", raw, e),
        })
}
