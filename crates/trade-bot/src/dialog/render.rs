//! Text and cards shown during a trade

use crate::interface::{Fact, ReceiptCard, ReceiptItem};
use crate::model::Operation;
use crate::pricing::round_money;
use rust_decimal::Decimal;

pub const WELCOME_PROMPT: &str = "Welcome! What can I help you with?";
pub const PORTFOLIO_INTRO: &str = "Very well, this is your portfolio.";
pub const TRADE_INTRO: &str = "Ok, you want to trade.";
pub const TRADE_PROMPT: &str = "What do you want to buy or sell?";
pub const EXECUTED: &str = "Operation executed.";
pub const STILL_LEARNING: &str = "I am still learning, you know?";
pub const HELP_TEXT: &str = "Some day, when the sun is bright in the sky and all the backlog tasks \
                             are completed, I will be able to give you help. Sorry.";
pub const TOO_MANY_RETRIES: &str =
    "Sorry, I still don't understand. Let's start over when you are ready.";

const SEPARATOR: &str = "----------------------------------";

/// `$ 1234.50` with exactly `decimals` places
pub fn money(value: Decimal, decimals: u32) -> String {
    format!("$ {:.*}", decimals as usize, round_money(value, decimals))
}

/// Reply to a declined confirmation
pub fn not_understood(input: &str) -> String {
    format!("I'm sorry I did not understand your order: '{input}'")
}

/// Stock and price lines, then the cost breakdown when the order is priced
pub fn order_summary(operation: &Operation, show_time: bool, decimals: u32) -> String {
    let mut lines = vec![format!("Stock: {}", operation.stock)];
    lines.push(match operation.unit_price {
        Some(price) => format!("Price: {}", money(price, decimals)),
        None => "Price: unknown".to_string(),
    });
    if show_time {
        lines.push(format!("TimeStamp: {}", timestamp(operation)));
    }

    match (operation.amount, operation.commission, operation.tax, operation.total()) {
        (Some(amount), Some(commission), Some(tax), Some(total)) => {
            lines.push(SEPARATOR.to_string());
            lines.push("OPERATION DETAILS".to_string());
            lines.push(SEPARATOR.to_string());
            lines.push(format!("Operation type: {}", operation.kind));
            lines.push(format!("Amount: {}", money(amount, decimals)));
            lines.push(format!("Commission: {}", money(commission, decimals)));
            lines.push(format!("TAX: {}", money(tax, decimals)));
            lines.push(SEPARATOR.to_string());
            lines.push(format!("Total: {}", money(total, decimals)));
            lines.push(SEPARATOR.to_string());
        }
        _ => {
            let mut missing = Vec::new();
            if operation.quantity.is_none() {
                missing.push("quantity");
            }
            if operation.unit_price.is_none() {
                missing.push("price");
            }
            lines.push(format!(
                "I could not determine the {} of this order, so no totals were computed.",
                missing.join(" and ")
            ));
        }
    }

    lines.join("\n")
}

/// "Do you wish to buy 25 MSFT stocks at $ 120.00?"
pub fn confirmation_question(operation: &Operation, show_time: bool, decimals: u32) -> String {
    let quantity = operation
        .quantity
        .map_or_else(|| "an unknown number of".to_string(), |q| q.to_string());
    let price = operation
        .unit_price
        .map_or_else(|| "an unknown price".to_string(), |p| money(p, decimals));
    let on = if show_time {
        format!(" on {}", timestamp(operation))
    } else {
        String::new()
    };

    format!(
        "Do you wish to {} {} {} stocks at {}{}?",
        operation.kind, quantity, operation.stock.ticker, price, on
    )
}

/// Receipt for an executed operation
pub fn receipt_card(
    operation: &Operation,
    broker: &str,
    transaction_id: Option<&str>,
    decimals: u32,
) -> ReceiptCard {
    let mut facts = vec![
        Fact::new("Broker", broker),
        Fact::new("Operation type", operation.kind.to_string()),
        Fact::new("Date", timestamp(operation)),
    ];
    if let Some(id) = transaction_id {
        facts.insert(0, Fact::new("Transaction", id));
    }

    let mut items = vec![ReceiptItem {
        title: operation.stock.to_string(),
        price: operation
            .unit_price
            .map_or_else(String::new, |p| money(p, decimals)),
        quantity: operation
            .quantity
            .map_or_else(String::new, |q| q.to_string()),
    }];
    if let Some(commission) = operation.commission {
        items.push(ReceiptItem {
            title: "Commission".to_string(),
            price: money(commission, decimals),
            quantity: "1".to_string(),
        });
    }

    ReceiptCard {
        title: format!("{} {}", operation.kind.as_str().to_uppercase(), operation.stock.ticker),
        facts,
        items,
        tax: operation
            .tax
            .map_or_else(String::new, |t| money(t, decimals)),
        total: operation
            .total()
            .map_or_else(String::new, |t| money(t, decimals)),
    }
}

fn timestamp(operation: &Operation) -> String {
    operation.timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}
