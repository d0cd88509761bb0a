//! Order pricing: commission and tax on a trade amount
//!
//! All rounding uses banker's rounding (round half to even) so totals are
//! reproducible.

use crate::error::{Result, TradeError};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Costs computed for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCost {
    /// Broker fee, rounded
    pub commission: Decimal,
    /// Levy on the commission, rounded
    pub tax: Decimal,
    /// amount + commission + tax
    pub total: Decimal,
}

/// Rates applied to every order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fraction of the amount charged by the broker
    pub commission_rate: Decimal,
    /// Fraction of the commission charged as tax
    pub tax_rate: Decimal,
    /// Decimal places for commission and tax
    pub decimals: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.005),
            tax_rate: dec!(0.01),
            decimals: 2,
        }
    }
}

impl PricingConfig {
    /// Price an amount with these rates
    pub fn quote(&self, amount: Decimal) -> Result<OrderCost> {
        price(amount, self.commission_rate, self.tax_rate, self.decimals)
    }
}

/// Round half to even at `decimals` places
pub fn round_money(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven)
}

/// Compute commission, tax and total for an order amount
///
/// `commission = round(amount * commission_rate)`,
/// `tax = round(commission * tax_rate)`, `total = amount + commission + tax`.
pub fn price(
    amount: Decimal,
    commission_rate: Decimal,
    tax_rate: Decimal,
    decimals: u32,
) -> Result<OrderCost> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TradeError::InvalidAmount(format!(
            "amount must not be negative: {amount}"
        )));
    }
    if commission_rate.is_sign_negative() && !commission_rate.is_zero() {
        return Err(TradeError::InvalidAmount(format!(
            "commission rate must not be negative: {commission_rate}"
        )));
    }
    if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
        return Err(TradeError::InvalidAmount(format!(
            "tax rate must not be negative: {tax_rate}"
        )));
    }

    let out_of_range = || TradeError::InvalidAmount(format!("amount out of range: {amount}"));
    let commission = round_money(
        amount.checked_mul(commission_rate).ok_or_else(out_of_range)?,
        decimals,
    );
    let tax = round_money(
        commission.checked_mul(tax_rate).ok_or_else(out_of_range)?,
        decimals,
    );
    let total = amount
        .checked_add(commission)
        .and_then(|sum| sum.checked_add(tax))
        .ok_or_else(out_of_range)?;

    Ok(OrderCost {
        commission,
        tax,
        total,
    })
}
