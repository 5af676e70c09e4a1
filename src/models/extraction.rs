use serde::{Deserialize, Serialize};
use std::fmt;

/// Signals read from one fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub stock_text: String,
    pub stock_number: Option<i64>,
    pub price: Option<f64>,
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stock_text='{}' stock_number=", self.stock_text)?;
        match self.stock_number {
            Some(number) => write!(f, "{}", number)?,
            None => f.write_str("None")?,
        }
        f.write_str(" price=")?;
        match self.price {
            Some(price) => write!(f, "{}", price),
            None => f.write_str("None"),
        }
    }
}
