//! On-disk representation of a portfolio

use crate::error::{Result, TradeError};
use crate::model::{Holding, Market, Portfolio, Stock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

/// Persisted portfolio
///
/// ```json
/// {"holdings": [{"ticker": "GOOG", "market": "NASDAQ", "company": "Google, Inc.",
///   "last_price": "1359", "avg_price": "1359", "quantity": "30",
///   "quantity_compromised": "0"}]}
/// ```
///
/// Numeric fields are read from JSON numbers or strings. Prices are written
/// back as strings, quantities as numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioRecord {
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub ticker: String,
    #[serde(default)]
    pub market: Market,
    #[serde(default)]
    pub company: String,
    #[serde(deserialize_with = "decimal_from_any")]
    pub last_price: Decimal,
    #[serde(deserialize_with = "decimal_from_any")]
    pub avg_price: Decimal,
    #[serde(deserialize_with = "count_from_any")]
    pub quantity: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub quantity_compromised: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    fn into_text(self) -> String {
        match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::Text(s) => s.trim().to_string(),
        }
    }
}

fn decimal_from_any<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = NumberOrString::deserialize(deserializer)?.into_text();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{text}': {e}")))
}

fn count_from_any<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = NumberOrString::deserialize(deserializer)?.into_text();
    text.parse::<u64>()
        .map_err(|e| serde::de::Error::custom(format!("invalid quantity '{text}': {e}")))
}

impl From<&Holding> for HoldingRecord {
    fn from(holding: &Holding) -> Self {
        Self {
            ticker: holding.stock.ticker.clone(),
            market: holding.stock.market,
            company: holding.stock.company.clone(),
            last_price: holding.last_price,
            avg_price: holding.average_price,
            quantity: holding.quantity,
            quantity_compromised: holding.quantity_reserved,
        }
    }
}

impl From<HoldingRecord> for Holding {
    fn from(record: HoldingRecord) -> Self {
        Self {
            stock: Stock::new(record.ticker, record.company, record.market),
            quantity: record.quantity,
            quantity_reserved: record.quantity_compromised,
            last_price: record.last_price,
            average_price: record.avg_price,
        }
    }
}

impl From<&Portfolio> for PortfolioRecord {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            holdings: portfolio.holdings.iter().map(HoldingRecord::from).collect(),
            cash: (!portfolio.cash.is_zero()).then_some(portfolio.cash),
        }
    }
}

impl PortfolioRecord {
    /// Hydrate a portfolio; duplicate tickers are rejected
    pub fn into_portfolio(self) -> Result<Portfolio> {
        let mut portfolio = Portfolio::new().with_cash(self.cash.unwrap_or_default());
        for record in self.holdings {
            if portfolio.holding(&record.ticker).is_some() {
                return Err(TradeError::StateError(format!(
                    "duplicate holding for {}",
                    record.ticker
                )));
            }
            portfolio.holdings.push(Holding::from(record));
        }
        Ok(portfolio)
    }

    /// Holdings used by `--seed-demo`
    pub fn demo() -> Self {
        let holding = |ticker: &str, company: &str, last: Decimal, avg: Decimal, quantity| {
            HoldingRecord {
                ticker: ticker.to_string(),
                market: Market::Nasdaq,
                company: company.to_string(),
                last_price: last,
                avg_price: avg,
                quantity,
                quantity_compromised: 0,
            }
        };

        Self {
            holdings: vec![
                holding("GOOG", "Google, Inc.", dec!(1359), dec!(1359), 30),
                holding("NFLX", "Netflix", dec!(301), dec!(262), 20),
                holding("FB", "Facebook, Inc.", dec!(198.8), dec!(210.5), 10),
            ],
            cash: None,
        }
    }
}
