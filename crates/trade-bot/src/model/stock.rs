//! Stock identity and listing market

use serde::{Deserialize, Serialize};
use std::fmt;

/// Formal market where a stock is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Market {
    /// National Association of Securities Dealers Automated Quotation
    #[default]
    #[serde(rename = "NASDAQ")]
    Nasdaq,
    /// New York Stock Exchange
    #[serde(rename = "NYSE")]
    Nyse,
}

impl Market {
    /// Short market code as used in persisted records
    pub fn code(&self) -> &'static str {
        match self {
            Market::Nasdaq => "NASDAQ",
            Market::Nyse => "NYSE",
        }
    }

    /// Full market name for display
    pub fn name(&self) -> &'static str {
        match self {
            Market::Nasdaq => "National Association of Securities Dealers Automated Quotation",
            Market::Nyse => "New York Stock Exchange",
        }
    }

    /// Parse a market code, case-insensitively
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "NASDAQ" => Some(Market::Nasdaq),
            "NYSE" => Some(Market::Nyse),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An investment instrument, identified by its ticker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stock {
    /// Unique short symbol, e.g. `MSFT`
    pub ticker: String,
    /// Company name
    pub company: String,
    /// Listing market
    pub market: Market,
}

impl Stock {
    /// Create a new stock
    pub fn new(ticker: impl Into<String>, company: impl Into<String>, market: Market) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            company: company.into(),
            market,
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ticker, self.company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_display() {
        let stock = Stock::new("msft", "Microsoft", Market::Nasdaq);
        assert_eq!(stock.ticker, "MSFT");
        assert_eq!(stock.to_string(), "MSFT (Microsoft)");
    }

    #[test]
    fn test_market_codes() {
        assert_eq!(Market::from_code("nyse"), Some(Market::Nyse));
        assert_eq!(Market::from_code(" NASDAQ "), Some(Market::Nasdaq));
        assert_eq!(Market::from_code("LSE"), None);
        assert_eq!(Market::Nyse.to_string(), "NYSE");
    }

    #[test]
    fn test_market_serde() {
        let json = serde_json::to_string(&Market::Nasdaq).unwrap();
        assert_eq!(json, "\"NASDAQ\"");
        let parsed: Market = serde_json::from_str("\"NYSE\"").unwrap();
        assert_eq!(parsed, Market::Nyse);
    }
}
