//! Trade intent extraction
//!
//! Classifies recognized entities into the parts of an order. Price and
//! quantity are told apart by span: the price is the single currency
//! amount, the quantity the single number outside every currency amount.

use crate::catalog::SymbolCatalog;
use crate::error::{Result, TradeError};
use crate::model::{Operation, OperationKind, Stock};
use crate::recognizer::{Entity, EntityKind, Resolution};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// What the user asked for; any part may be missing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeIntent {
    pub kind: Option<OperationKind>,
    pub stock: Option<Stock>,
    pub quantity: Option<u64>,
    pub price: Option<Decimal>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TradeIntent {
    pub fn parse(text: &str, entities: &[Entity], catalog: &SymbolCatalog) -> Self {
        let intent = Self {
            kind: operation_kind(text),
            stock: catalog.find_in(text).cloned(),
            quantity: quantity(entities),
            price: price(entities),
            timestamp: timestamp(entities),
        };
        debug!(
            kind = ?intent.kind,
            ticker = intent.stock.as_ref().map(|s| s.ticker.as_str()),
            quantity = ?intent.quantity,
            price = ?intent.price,
            "Classified trade entities"
        );
        intent
    }

    /// Build the operation; fails when the order has no direction or stock
    ///
    /// Missing quantity or price still yields an operation, left unpriced.
    pub fn into_operation(self, input: &str) -> Result<Operation> {
        let kind = self.kind.ok_or_else(|| {
            TradeError::ParseAmbiguous(format!("could not tell buy from sell in '{input}'"))
        })?;
        let stock = self
            .stock
            .ok_or_else(|| TradeError::UnknownTicker(input.to_string()))?;

        let mut operation = Operation::new(stock, kind);
        if let Some(quantity) = self.quantity {
            operation = operation.with_quantity(quantity);
        }
        if let Some(price) = self.price {
            operation = operation.with_unit_price(price);
        }
        if let Some(timestamp) = self.timestamp {
            operation = operation.at(timestamp);
        }
        Ok(operation)
    }
}

/// `buy` or `sell` as a whole word; both or neither is undecided
fn operation_kind(text: &str) -> Option<OperationKind> {
    let mut buy = false;
    let mut sell = false;
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.eq_ignore_ascii_case("buy") {
            buy = true;
        } else if word.eq_ignore_ascii_case("sell") {
            sell = true;
        }
    }

    match (buy, sell) {
        (true, false) => Some(OperationKind::Buy),
        (false, true) => Some(OperationKind::Sell),
        _ => None,
    }
}

fn price(entities: &[Entity]) -> Option<Decimal> {
    let mut currencies = entities.iter().filter(|e| e.kind == EntityKind::Currency);
    let (Some(only), None) = (currencies.next(), currencies.next()) else {
        return None;
    };
    only.decimal_value().filter(|value| value.is_sign_positive() && !value.is_zero())
}

fn quantity(entities: &[Entity]) -> Option<u64> {
    let currencies: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Currency)
        .collect();
    let mut numbers = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Number)
        .filter(|e| !currencies.iter().any(|c| e.is_within(c)));

    let (Some(only), None) = (numbers.next(), numbers.next()) else {
        return None;
    };
    let value = only.decimal_value()?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u64().filter(|&q| q > 0)
}

fn timestamp(entities: &[Entity]) -> Option<DateTime<Utc>> {
    entities.iter().find_map(|e| match (&e.kind, &e.resolution) {
        (EntityKind::DateTime, Some(Resolution::DateTime(at))) => Some(at.and_utc()),
        (EntityKind::Date, Some(Resolution::Date(date))) => {
            date.and_hms_opt(0, 0, 0).map(|at| at.and_utc())
        }
        _ => None,
    })
}
