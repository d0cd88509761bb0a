//! Trading bot host
//!
//! [`TradeBot`] receives one message at a time per conversation, feeds it to
//! the [`TradeDialog`] suspended for that conversation and persists whatever
//! the step changed.
//!
//! # Features
//!
//! - **Waterfall dialog**: menu, portfolio, trade description, confirmation
//! - **Slash commands**: `/portfolio`, `/history`, `/cancel` bypass the dialog
//! - **Per-conversation isolation**: each turn runs under the conversation lock
//! - **Idle timeout**: a dialog left suspended too long starts over
//!
//! # Example
//!
//! ```rust,ignore
//! use trade_bot::bot::TradeBot;
//! use trade_bot::config::BotConfig;
//! use trade_bot::store::JsonFileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let store = Arc::new(JsonFileStore::new(&config.data_dir));
//!     let bot = TradeBot::new(config, store)?;
//!     let response = bot.process_input("alice", "hi").await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod conversation;

use crate::broker::{Broker, PaperBroker};
use crate::catalog::SymbolCatalog;
use crate::config::BotConfig;
use crate::dialog::render;
use crate::dialog::{TradeDialog, TurnState};
use crate::error::Result;
use crate::interface::{
    Activity, BotResponse, ConversationSession, ConversationStore, InMemoryConversationStore,
};
use crate::model::Operation;
use crate::recognizer::{EntityRecognizer, RuleRecognizer};
use crate::store::{ConversationLocks, JsonFileStore, PortfolioStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use commands::Command;
pub use conversation::{Exchange, Transcript};

const NO_ORDERS: &str = "No orders confirmed in this session.";

/// Conversational host of the trading dialog
pub struct TradeBot {
    config: BotConfig,
    dialog: TradeDialog,
    portfolios: Arc<dyn PortfolioStore>,
    sessions: Arc<dyn ConversationStore>,
    locks: ConversationLocks,
}

impl TradeBot {
    /// Bot with the rule recognizer and the paper broker
    pub fn new(config: BotConfig, portfolios: Arc<dyn PortfolioStore>) -> Result<Self> {
        Self::builder(config).portfolios(portfolios).build()
    }

    /// Create a builder
    pub fn builder(config: BotConfig) -> TradeBotBuilder {
        TradeBotBuilder {
            config,
            recognizer: None,
            broker: None,
            catalog: None,
            portfolios: None,
            sessions: None,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Greet every joining member other than the bot itself
    pub fn on_members_added(&self, member_ids: &[String], bot_id: &str) -> BotResponse {
        let mut response = BotResponse::new();
        for member in member_ids.iter().filter(|id| id.as_str() != bot_id) {
            debug!(member = %member, "Member joined");
            response.push(Activity::text(self.welcome()));
        }
        response
    }

    /// Process user input, routing slash commands around the dialog
    pub async fn process_input(&self, conversation_id: &str, input: &str) -> Result<BotResponse> {
        let command = Command::parse(input)?;
        self.execute_command(conversation_id, command).await
    }

    /// Execute a parsed command
    pub async fn execute_command(
        &self,
        conversation_id: &str,
        command: Command,
    ) -> Result<BotResponse> {
        match command {
            Command::Message { text } => self.on_message(conversation_id, Some(&text)).await,
            Command::Cancel => Ok(self.cancel(conversation_id).await),
            Command::Portfolio => {
                let _guard = self.locks.lock(conversation_id).await;
                let portfolio = self.portfolios.load_or_default(conversation_id).await?;
                Ok(BotResponse::from_text(portfolio.show()))
            }
            Command::History => Ok(self.history(conversation_id).await),
            Command::Help => Ok(BotResponse::from_text(Command::help_text().trim())),
            Command::Exit => Ok(BotResponse::from_text("Goodbye!")),
        }
    }

    /// Run one dialog step for an inbound message
    ///
    /// Starts a fresh dialog when none is suspended for the conversation,
    /// otherwise hands `text` to the suspended step. `None` stands for a
    /// message without text.
    pub async fn on_message(
        &self,
        conversation_id: &str,
        text: Option<&str>,
    ) -> Result<BotResponse> {
        let _guard = self.locks.lock(conversation_id).await;

        let mut session = self.session(conversation_id);
        session.update_activity();
        if session
            .dialog
            .as_ref()
            .is_some_and(|state| state.is_expired(self.config.idle_timeout))
        {
            info!(conversation = %conversation_id, "Discarding idle dialog");
            session.dialog = None;
        }

        let mut portfolio = self.portfolios.load_or_default(conversation_id).await?;
        portfolio.history = std::mem::take(&mut session.orders);

        let mut turn = match session.dialog.as_mut() {
            Some(state) => self.dialog.resume(state, &mut portfolio, text).await,
            None => {
                let mut state = TurnState::new();
                let turn = self.dialog.begin(&mut state);
                session.dialog = Some(state);
                turn
            }
        };

        if turn.portfolio_changed {
            if let Err(e) = self.portfolios.save(conversation_id, &portfolio).await {
                warn!(conversation = %conversation_id, error = %e, "Failed to save portfolio");
                turn.activities.push(Activity::text(format!(
                    "Your order was executed but the portfolio could not be saved: {e}"
                )));
            }
        }
        if turn.is_complete() {
            session.dialog = None;
        }
        session.orders = std::mem::take(&mut portfolio.history);

        let response = BotResponse {
            activities: turn.activities,
        };
        session
            .transcript
            .push(text.unwrap_or_default(), response.text());
        self.sessions.set(session);

        Ok(response)
    }

    /// Drop the suspended dialog of a conversation
    pub async fn cancel(&self, conversation_id: &str) -> BotResponse {
        let _guard = self.locks.lock(conversation_id).await;

        let Some(mut session) = self.sessions.get(conversation_id) else {
            return BotResponse::from_text("Nothing to cancel.");
        };
        let text = if session.dialog.take().is_some() {
            info!(conversation = %conversation_id, "Dialog cancelled");
            "Dialog cancelled. Say anything to start over."
        } else {
            "Nothing to cancel."
        };
        self.sessions.set(session);
        BotResponse::from_text(text)
    }

    /// Orders confirmed in this session, oldest first
    pub async fn history(&self, conversation_id: &str) -> BotResponse {
        let _guard = self.locks.lock(conversation_id).await;

        let orders = self
            .sessions
            .get(conversation_id)
            .map(|session| session.orders)
            .unwrap_or_default();
        if orders.is_empty() {
            return BotResponse::from_text(NO_ORDERS);
        }

        let decimals = self.config.pricing.decimals;
        let lines: Vec<String> = orders
            .iter()
            .map(|order| history_line(order, decimals))
            .collect();
        BotResponse::from_text(format!("Orders:\n  {}", lines.join("\n  ")))
    }

    /// Forget conversations idle for longer than the idle timeout
    pub fn cleanup_idle(&self) -> usize {
        let max_age = i64::try_from(self.config.idle_timeout.as_secs()).unwrap_or(i64::MAX);
        let removed = self.sessions.cleanup_expired(max_age);
        self.locks.prune();
        if removed > 0 {
            debug!(removed, "Removed idle conversations");
        }
        removed
    }

    fn session(&self, conversation_id: &str) -> ConversationSession {
        self.sessions
            .get(conversation_id)
            .unwrap_or_else(|| ConversationSession::new(conversation_id, self.config.max_history))
    }
}

fn history_line(order: &Operation, decimals: u32) -> String {
    let amount = |value: Option<rust_decimal::Decimal>| {
        value.map_or_else(|| "?".to_string(), |v| render::money(v, decimals))
    };
    format!(
        "{} {} {} {} at {} total {}",
        order.timestamp.format("%Y-%m-%d %H:%M"),
        order.kind.as_str().to_uppercase(),
        order
            .quantity
            .map_or_else(|| "?".to_string(), |q| q.to_string()),
        order.stock.ticker,
        amount(order.unit_price),
        amount(order.total()),
    )
}

/// Builder for [`TradeBot`]
pub struct TradeBotBuilder {
    config: BotConfig,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    broker: Option<Arc<dyn Broker>>,
    catalog: Option<SymbolCatalog>,
    portfolios: Option<Arc<dyn PortfolioStore>>,
    sessions: Option<Arc<dyn ConversationStore>>,
}

impl TradeBotBuilder {
    pub fn recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn broker(mut self, broker: Arc<dyn Broker>) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn catalog(mut self, catalog: SymbolCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn portfolios(mut self, store: Arc<dyn PortfolioStore>) -> Self {
        self.portfolios = Some(store);
        self
    }

    pub fn sessions(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    /// Build the bot; unset collaborators get their defaults
    pub fn build(self) -> Result<TradeBot> {
        self.config.validate()?;

        let recognizer: Arc<dyn EntityRecognizer> = match self.recognizer {
            Some(recognizer) => recognizer,
            None => Arc::new(RuleRecognizer::new()?),
        };
        let broker = self
            .broker
            .unwrap_or_else(|| Arc::new(PaperBroker::default()));
        let portfolios = self
            .portfolios
            .unwrap_or_else(|| Arc::new(JsonFileStore::new(&self.config.data_dir)));
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemoryConversationStore::new()));

        let dialog = TradeDialog::new(recognizer, broker)
            .with_catalog(self.catalog.unwrap_or_default())
            .with_locale(self.config.locale.clone())
            .with_pricing(self.config.pricing)
            .with_max_retries(self.config.max_prompt_retries);

        info!(
            broker = %dialog.broker_name(),
            locale = %self.config.locale,
            "Trade bot ready"
        );

        Ok(TradeBot {
            config: self.config,
            dialog,
            portfolios,
            sessions,
            locks: ConversationLocks::new(),
        })
    }
}
