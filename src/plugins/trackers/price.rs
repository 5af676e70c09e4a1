use regex::Regex;

use crate::utils::error::Result;
use crate::utils::text::normalize_nbsp;

/// Parses prices written with the European convention: `.` groups thousands
/// and `,` marks decimals.
#[derive(Debug, Clone)]
pub struct PriceParser {
    price_regex: Regex,
}

impl PriceParser {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(PriceParser {
            price_regex: Regex::new(pattern)?,
        })
    }

    pub fn parse(&self, text: Option<&str>) -> Option<f64> {
        parse_price(text, &self.price_regex)
    }
}

/// Reads the first capture of `pattern` from `text` as a price.
///
/// Returns `None` for empty input, no match, or a capture that is not a
/// number once `.` is stripped and `,` becomes the decimal point.
pub fn parse_price(text: Option<&str>, pattern: &Regex) -> Option<f64> {
    let text = text.filter(|t| !t.is_empty())?;
    let normalized = normalize_nbsp(text);
    let captures = pattern.captures(&normalized)?;
    let raw = captures.get(1)?.as_str();
    european_to_f64(raw)
}

fn european_to_f64(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('.', "").replace(',', ".");
    cleaned.trim().parse::<f64>().ok()
}
