//! Value formatting (pure).
//!
//! - `date`: pattern-based date format/parse
//! - `currency`: money format/unformat

pub mod currency;
pub mod date;

pub use currency::{format_money, unformat, CurrencyFormat};
pub use date::{format as format_date, parse as parse_date, DateParseError};

/// Default pattern for dates arriving from the data source.
pub const DEFAULT_DATA_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Default pattern for dates shown in cells.
pub const DEFAULT_DISPLAY_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm";

/// Formats shared by ingestion and display.
#[derive(Debug, Clone, PartialEq)]
pub struct Formats {
    /// Pattern used to parse raw date values.
    pub data_date: String,
    /// Pattern used to display date values.
    pub display_date: String,
    pub currency: CurrencyFormat,
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            data_date: DEFAULT_DATA_DATE_FORMAT.to_string(),
            display_date: DEFAULT_DISPLAY_DATE_FORMAT.to_string(),
            currency: CurrencyFormat::default(),
        }
    }
}
