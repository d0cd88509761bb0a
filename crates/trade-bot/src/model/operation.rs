//! Buy/sell operations

use crate::error::{Result, TradeError};
use crate::model::Stock;
use crate::pricing::OrderCost;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Buy,
    Sell,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Quantity or price missing; cannot be executed
    Invalid,
    /// Fully priced, waiting for confirmation
    Pending,
    /// Submitted to the broker
    InProgress,
    Success,
    Failure,
}

/// An intended or executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub stock: Stock,
    pub kind: OperationKind,
    pub quantity: Option<u64>,
    pub unit_price: Option<Decimal>,
    /// quantity × unit_price
    pub amount: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
    pub status: OperationStatus,
}

impl Operation {
    /// Create an unpriced operation stamped with the current time
    pub fn new(stock: Stock, kind: OperationKind) -> Self {
        Self {
            stock,
            kind,
            quantity: None,
            unit_price: None,
            amount: None,
            commission: None,
            tax: None,
            timestamp: Utc::now(),
            status: OperationStatus::Invalid,
        }
    }

    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Gross amount when both quantity and unit price are known
    ///
    /// Fails when quantity × unit price does not fit in a `Decimal`.
    pub fn gross_amount(&self) -> Result<Option<Decimal>> {
        let (Some(quantity), Some(price)) = (self.quantity, self.unit_price) else {
            return Ok(None);
        };
        Decimal::from(quantity)
            .checked_mul(price)
            .map(Some)
            .ok_or_else(|| {
                TradeError::InvalidAmount(format!(
                    "{quantity} {} at {price} overflows the order amount",
                    self.stock.ticker
                ))
            })
    }

    /// Attach computed costs and mark the operation ready for confirmation
    pub fn apply_cost(&mut self, amount: Decimal, cost: &OrderCost) {
        self.amount = Some(amount);
        self.commission = Some(cost.commission);
        self.tax = Some(cost.tax);
        self.status = OperationStatus::Pending;
    }

    pub fn is_priced(&self) -> bool {
        self.amount.is_some() && self.commission.is_some() && self.tax.is_some()
    }

    /// amount + commission + tax; `None` when unpriced or out of range
    pub fn total(&self) -> Option<Decimal> {
        self.amount?
            .checked_add(self.commission?)?
            .checked_add(self.tax?)
    }
}
