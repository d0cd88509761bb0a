//! Holdings owned by a conversation

use crate::error::{Result, TradeError};
use crate::model::{Operation, OperationKind, Stock};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for weighted average prices
const AVERAGE_PRICE_DECIMALS: u32 = 4;

/// Text shown for a portfolio without holdings
pub const EMPTY_PORTFOLIO: &str = "Portfolio Empty.";

/// A position in one stock
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub stock: Stock,
    /// Shares owned
    pub quantity: u64,
    /// Shares committed to open orders
    pub quantity_reserved: u64,
    /// Price of the most recent trade
    pub last_price: Decimal,
    /// Weighted average buy price
    pub average_price: Decimal,
}

impl Holding {
    /// Create a holding from a first buy
    pub fn new(stock: Stock, quantity: u64, price: Decimal) -> Self {
        Self {
            stock,
            quantity,
            quantity_reserved: 0,
            last_price: price,
            average_price: price,
        }
    }

    /// Column header matching [`Holding::to_line`]
    pub fn header() -> String {
        format!(
            "{:<6} {:<15}\t{:<8}\t{:<10}\t{:<14}",
            "ticker", "company", "quantity", "last price", "avg buy price"
        )
    }

    /// One padded line for the portfolio listing
    pub fn to_line(&self) -> String {
        format!(
            "{:<6} {:<15}\t{:<8}\t{:<10}\t{:<14}",
            self.stock.ticker,
            self.stock.company,
            self.quantity,
            format!("$ {}", self.last_price),
            format!("$ {}", self.average_price),
        )
    }

    /// Quantity and weighted average price after buying `quantity` more at
    /// `price`, or `None` when either leaves its numeric range
    fn merged_lot(&self, quantity: u64, price: Decimal) -> Option<(u64, Decimal)> {
        let merged = self.quantity.checked_add(quantity)?;
        if merged == 0 {
            return Some((0, self.average_price));
        }
        let cost = Decimal::from(self.quantity)
            .checked_mul(self.average_price)?
            .checked_add(Decimal::from(quantity).checked_mul(price)?)?;
        let average = cost
            .checked_div(Decimal::from(merged))?
            .round_dp_with_strategy(AVERAGE_PRICE_DECIMALS, RoundingStrategy::MidpointNearestEven)
            .normalize();
        Some((merged, average))
    }

    fn add_lot(&mut self, quantity: u64, price: Decimal) -> Result<()> {
        let (merged, average) = self.merged_lot(quantity, price).ok_or_else(|| {
            TradeError::PositionLimit {
                ticker: self.stock.ticker.clone(),
                held: self.quantity,
                requested: quantity,
            }
        })?;
        self.quantity = merged;
        self.average_price = average;
        self.last_price = price;
        Ok(())
    }
}

/// The user's holdings, at most one per ticker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portfolio {
    /// Positions in insertion order
    pub holdings: Vec<Holding>,
    /// Free cash; informational, trades do not settle against it
    pub cash: Decimal,
    /// Confirmed operations of this session, newest last
    pub history: Vec<Operation>,
}

impl Portfolio {
    /// Create an empty portfolio
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cash(mut self, cash: Decimal) -> Self {
        self.cash = cash;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.holdings
            .iter()
            .find(|h| h.stock.ticker.eq_ignore_ascii_case(ticker))
    }

    fn holding_mut(&mut self, ticker: &str) -> Option<&mut Holding> {
        self.holdings
            .iter_mut()
            .find(|h| h.stock.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Shares currently held for a ticker
    pub fn held_quantity(&self, ticker: &str) -> u64 {
        self.holding(ticker).map_or(0, |h| h.quantity)
    }

    /// Fail when selling `quantity` would take the position below zero
    pub fn check_sell(&self, ticker: &str, quantity: u64) -> Result<()> {
        let held = self.held_quantity(ticker);
        if quantity > held {
            return Err(TradeError::InsufficientHoldings {
                ticker: ticker.to_string(),
                held,
                requested: quantity,
            });
        }
        Ok(())
    }

    /// Fail when buying `quantity` at `price` would push the position out of range
    pub fn check_buy(&self, ticker: &str, quantity: u64, price: Decimal) -> Result<()> {
        let Some(holding) = self.holding(ticker) else {
            return Ok(());
        };
        match holding.merged_lot(quantity, price) {
            Some(_) => Ok(()),
            None => Err(TradeError::PositionLimit {
                ticker: ticker.to_string(),
                held: holding.quantity,
                requested: quantity,
            }),
        }
    }

    /// Merge an operation into the holdings by ticker
    ///
    /// A buy adds to the existing holding or appends a new one; a sell
    /// subtracts and never goes below zero.
    pub fn upsert(&mut self, operation: &Operation) -> Result<&Holding> {
        let (Some(quantity), Some(price)) = (operation.quantity, operation.unit_price) else {
            return Err(TradeError::ParseAmbiguous(
                "operation has no quantity or price".to_string(),
            ));
        };
        let ticker = operation.stock.ticker.clone();

        match operation.kind {
            OperationKind::Buy => {
                if let Some(holding) = self.holding_mut(&ticker) {
                    holding.add_lot(quantity, price)?;
                } else {
                    self.holdings
                        .push(Holding::new(operation.stock.clone(), quantity, price));
                }
            }
            OperationKind::Sell => {
                self.check_sell(&ticker, quantity)?;
                if let Some(holding) = self.holding_mut(&ticker) {
                    holding.quantity -= quantity;
                    holding.last_price = price;
                }
            }
        }

        self.holding(&ticker)
            .ok_or_else(|| TradeError::Other(format!("holding for {ticker} vanished")))
    }

    /// Append a confirmed operation to the session's order history
    pub fn record(&mut self, operation: Operation) {
        self.history.push(operation);
    }

    /// Plain-text listing of the holdings
    pub fn show(&self) -> String {
        if self.holdings.is_empty() {
            return EMPTY_PORTFOLIO.to_string();
        }

        let mut result = Holding::header();
        result.push('\n');
        for holding in &self.holdings {
            result.push_str(&holding.to_line());
            result.push('\n');
        }
        result.push_str(&format!("Cash: $ {}", self.cash));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Market;
    use rust_decimal_macros::dec;

    fn msft() -> Stock {
        Stock::new("MSFT", "Microsoft", Market::Nasdaq)
    }

    fn buy(quantity: u64, price: Decimal) -> Operation {
        Operation::new(msft(), OperationKind::Buy)
            .with_quantity(quantity)
            .with_unit_price(price)
    }

    fn sell(quantity: u64, price: Decimal) -> Operation {
        Operation::new(msft(), OperationKind::Sell)
            .with_quantity(quantity)
            .with_unit_price(price)
    }

    #[test]
    fn test_empty_portfolio_show() {
        assert_eq!(Portfolio::new().show(), "Portfolio Empty.");
    }

    #[test]
    fn test_upsert_merges_by_ticker() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(10, dec!(100))).unwrap();
        portfolio.upsert(&buy(30, dec!(120))).unwrap();

        assert_eq!(portfolio.holdings.len(), 1);
        let holding = portfolio.holding("MSFT").unwrap();
        assert_eq!(holding.quantity, 40);
        assert_eq!(holding.last_price, dec!(120));
        assert_eq!(holding.average_price, dec!(115));
    }

    #[test]
    fn test_upsert_distinct_tickers() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(1, dec!(10))).unwrap();
        let goog = Operation::new(
            Stock::new("GOOG", "Google, Inc.", Market::Nasdaq),
            OperationKind::Buy,
        )
        .with_quantity(2)
        .with_unit_price(dec!(20));
        portfolio.upsert(&goog).unwrap();

        assert_eq!(portfolio.holdings.len(), 2);
        assert_eq!(portfolio.holdings[1].stock.ticker, "GOOG");
    }

    #[test]
    fn test_sell_reduces_quantity() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(10, dec!(100))).unwrap();
        let holding = portfolio.upsert(&sell(4, dec!(110))).unwrap();

        assert_eq!(holding.quantity, 6);
        assert_eq!(holding.last_price, dec!(110));
        assert_eq!(holding.average_price, dec!(100));
    }

    #[test]
    fn test_oversell_rejected() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(3, dec!(100))).unwrap();

        let err = portfolio.upsert(&sell(5, dec!(100))).unwrap_err();
        assert!(matches!(
            err,
            TradeError::InsufficientHoldings { held: 3, requested: 5, .. }
        ));
        assert_eq!(portfolio.held_quantity("MSFT"), 3);
    }

    #[test]
    fn test_sell_without_holding_rejected() {
        let mut portfolio = Portfolio::new();
        assert!(portfolio.upsert(&sell(1, dec!(100))).is_err());
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_unpriced_operation_rejected() {
        let mut portfolio = Portfolio::new();
        let op = Operation::new(msft(), OperationKind::Buy).with_quantity(5);
        assert!(matches!(
            portfolio.upsert(&op),
            Err(TradeError::ParseAmbiguous(_))
        ));
    }

    #[test]
    fn test_buy_past_position_limit_rejected() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(u64::MAX, dec!(1))).unwrap();

        assert!(portfolio.check_buy("MSFT", 0, dec!(1)).is_ok());
        assert!(portfolio.check_buy("GOOG", u64::MAX, dec!(1)).is_ok());
        assert!(matches!(
            portfolio.check_buy("MSFT", 1, dec!(1)),
            Err(TradeError::PositionLimit { requested: 1, .. })
        ));

        let err = portfolio.upsert(&buy(1, dec!(1))).unwrap_err();
        assert!(matches!(err, TradeError::PositionLimit { held: u64::MAX, .. }));
        let holding = portfolio.holding("MSFT").unwrap();
        assert_eq!(holding.quantity, u64::MAX);
        assert_eq!(holding.average_price, dec!(1));
    }

    #[test]
    fn test_buy_with_unpriceable_average_rejected() {
        let mut portfolio = Portfolio::new();
        portfolio.upsert(&buy(1_000_000, Decimal::MAX / dec!(2))).unwrap();
        assert!(portfolio.check_buy("MSFT", 1, dec!(1)).is_err());
        assert_eq!(portfolio.held_quantity("MSFT"), 1_000_000);
    }

    #[test]
    fn test_show_lists_holdings() {
        let mut portfolio = Portfolio::new().with_cash(dec!(250));
        portfolio.upsert(&buy(25, dec!(120))).unwrap();

        let text = portfolio.show();
        assert!(text.starts_with("ticker"));
        assert!(text.contains("MSFT"));
        assert!(text.contains("Microsoft"));
        assert!(text.contains("$ 120"));
        assert!(text.ends_with("Cash: $ 250"));
    }
}
