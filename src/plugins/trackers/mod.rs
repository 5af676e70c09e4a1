// Value parsers for selector-matched text
pub mod price;
pub mod stock;

pub use price::{PriceParser, parse_price};
pub use stock::parse_stock_number;
