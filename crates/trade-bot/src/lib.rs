//! Conversational bot for simulated stock trading
//!
//! A user talks to the bot through a turn-based dialog. The bot recognizes
//! trade intents (buy or sell, ticker, quantity, price, timestamp) in free
//! text, quotes commission and tax, asks for confirmation and records the
//! trade in a small persisted portfolio. No real brokerage is involved.
//!
//! # Architecture
//!
//! Each inbound message advances the conversation's dialog by exactly one
//! step:
//! - `Options`: show the menu (Portfolio, Trade, Help)
//! - `Branch`: show holdings or help, or ask for the trade
//! - `ParseIntent`: extract entities, price the order, echo a summary
//! - `Confirm`: submit to the broker and update the portfolio
//!
//! Collaborators sit behind traits so hosts can swap them:
//! - [`EntityRecognizer`](recognizer::EntityRecognizer): number, currency and date extraction
//! - [`PortfolioStore`](store::PortfolioStore): holdings persistence
//! - [`Broker`](broker::Broker): order execution
//! - [`ConversationStore`](interface::ConversationStore): per-conversation state
//!
//! # Example
//!
//! ```rust,ignore
//! use trade_bot::{BotConfig, TradeBot};
//! use trade_bot::store::InMemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = TradeBot::new(BotConfig::default(), Arc::new(InMemoryStore::new()))?;
//!
//!     bot.process_input("alice", "hi").await?;
//!     bot.process_input("alice", "Trade").await?;
//!     let reply = bot.process_input("alice", "Buy 25 MSFT for $120").await?;
//!     println!("{}", reply.text());
//!
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod broker;
pub mod catalog;
pub mod config;
pub mod dialog;
pub mod error;
pub mod interface;
pub mod model;
pub mod pricing;
pub mod recognizer;
pub mod store;

// Re-export main types for convenience
pub use bot::{Command, TradeBot, TradeBotBuilder};
pub use broker::{Broker, BrokerReceipt, ExecutionStatus, PaperBroker};
pub use catalog::SymbolCatalog;
pub use config::BotConfig;
pub use dialog::{DialogStep, TradeDialog, TurnState};
pub use error::{Result, TradeError};
pub use model::{Holding, Market, Operation, OperationKind, OperationStatus, Portfolio, Stock};
pub use pricing::{OrderCost, PricingConfig, price};
pub use recognizer::{Entity, EntityKind, EntityRecognizer, Locale, RuleRecognizer};
pub use store::{InMemoryStore, JsonFileStore, PortfolioStore};
