//! The trading dialog
//!
//! A four step waterfall: present options, branch on the choice, parse a
//! trade order, confirm it. Every step ends by either finishing the dialog
//! or sending a prompt and suspending. The next inbound message resumes the
//! dialog at the step recorded in [`TurnState`].
//!
//! ```text
//! Options --> Branch --Portfolio/Help--> done
//!               |
//!             Trade --> ParseIntent --> Confirm --> done
//! ```
//!
//! The portfolio is only mutated in `Confirm`, after the user said yes and
//! the broker filled the order.

pub mod intent;
pub mod prompt;
pub mod render;
pub mod state;

pub use intent::TradeIntent;
pub use state::{DialogStep, MenuOption, TurnState};

use crate::broker::Broker;
use crate::catalog::SymbolCatalog;
use crate::error::{Result, TradeError};
use crate::interface::{Activity, Prompt, ReceiptCard};
use crate::model::{Operation, OperationKind, OperationStatus, Portfolio};
use crate::pricing::PricingConfig;
use crate::recognizer::{EntityRecognizer, Locale};
use prompt::Reply;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Replies that may fail in a row before the dialog gives up
pub const DEFAULT_MAX_PROMPT_RETRIES: u32 = 3;

/// Whether the dialog is waiting for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStatus {
    Waiting,
    Complete,
}

/// Output of one dialog step
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub activities: Vec<Activity>,
    pub status: DialogStatus,
    /// Set when a confirmed operation changed the holdings
    pub portfolio_changed: bool,
}

impl Turn {
    fn new() -> Self {
        Self {
            activities: Vec::new(),
            status: DialogStatus::Waiting,
            portfolio_changed: false,
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        self.activities.push(Activity::Text(text.into()));
    }

    fn show(&mut self, card: ReceiptCard) {
        self.activities.push(Activity::Card(card));
    }

    pub fn is_complete(&self) -> bool {
        self.status == DialogStatus::Complete
    }
}

/// What a step decided
#[derive(Debug)]
enum Next {
    /// Move to the following step and wait on this prompt
    Advance(Prompt),
    /// Ask the pending prompt again, optionally explaining why
    Repeat(Option<String>),
    End,
}

/// The trading waterfall
///
/// Holds only shared, read-only collaborators; all per-conversation data
/// lives in the [`TurnState`] and [`Portfolio`] passed to each call.
pub struct TradeDialog {
    recognizer: Arc<dyn EntityRecognizer>,
    broker: Arc<dyn Broker>,
    catalog: SymbolCatalog,
    locale: Locale,
    pricing: PricingConfig,
    max_retries: u32,
}

impl TradeDialog {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, broker: Arc<dyn Broker>) -> Self {
        Self {
            recognizer,
            broker,
            catalog: SymbolCatalog::default(),
            locale: Locale::default(),
            pricing: PricingConfig::default(),
            max_retries: DEFAULT_MAX_PROMPT_RETRIES,
        }
    }

    pub fn with_catalog(mut self, catalog: SymbolCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn broker_name(&self) -> &str {
        self.broker.name()
    }

    /// Run the options step of a fresh dialog
    pub fn begin(&self, state: &mut TurnState) -> Turn {
        info!(dialog_id = %state.dialog_id, "Dialog started");
        state.step = DialogStep::Options;
        state.touch();

        let mut turn = Turn::new();
        let menu = Prompt::choice(render::WELCOME_PROMPT, MenuOption::labels());
        self.apply(state, &mut turn, Next::Advance(menu));
        turn
    }

    /// Feed one reply to the step the dialog is suspended on
    pub async fn resume(
        &self,
        state: &mut TurnState,
        portfolio: &mut Portfolio,
        reply: Option<&str>,
    ) -> Turn {
        // Nothing suspended yet, or a stored state that never left the menu
        let pending = match state.pending_prompt.clone() {
            Some(pending) if state.step != DialogStep::Options => pending,
            _ => return self.begin(state),
        };
        state.touch();

        let mut turn = Turn::new();
        let Some(answer) = prompt::recognize(&pending, reply) else {
            debug!(step = %state.step, "Reply did not match the pending prompt");
            self.apply(state, &mut turn, Next::Repeat(None));
            return turn;
        };

        let result = match state.step {
            // restarted above
            DialogStep::Options => Ok(Next::Repeat(None)),
            DialogStep::Branch => Ok(self.branch(state, portfolio, answer, &mut turn)),
            DialogStep::ParseIntent => self.parse_intent(state, portfolio, answer, &mut turn),
            DialogStep::Confirm => self.confirm(state, portfolio, answer, &mut turn).await,
        };

        let next = result.unwrap_or_else(|e| {
            warn!(step = %state.step, error = %e, "Dialog step failed");
            turn.say(format!("Sorry, something went wrong: {e}"));
            Next::End
        });
        self.apply(state, &mut turn, next);
        turn
    }

    fn apply(&self, state: &mut TurnState, turn: &mut Turn, next: Next) {
        match next {
            Next::Advance(prompt) => match state.step.next(state.selected_option) {
                Some(step) => {
                    debug!(from = %state.step, to = %step, "Dialog advanced");
                    state.step = step;
                    state.retries = 0;
                    state.pending_prompt = Some(prompt.clone());
                    turn.activities.push(Activity::Prompt(prompt));
                    turn.status = DialogStatus::Waiting;
                }
                None => self.apply(state, turn, Next::End),
            },
            Next::Repeat(reason) => {
                state.retries = state.retries.saturating_add(1);
                if state.retries >= self.max_retries {
                    warn!(dialog_id = %state.dialog_id, retries = state.retries, "Giving up on dialog");
                    turn.say(render::TOO_MANY_RETRIES);
                    self.apply(state, turn, Next::End);
                    return;
                }

                let Some(pending) = state.pending_prompt.as_ref() else {
                    self.apply(state, turn, Next::End);
                    return;
                };
                let again = match reason {
                    Some(reason) => {
                        turn.say(reason);
                        pending.clone()
                    }
                    None => prompt::retry(pending),
                };
                turn.activities.push(Activity::Prompt(again));
                turn.status = DialogStatus::Waiting;
            }
            Next::End => {
                info!(dialog_id = %state.dialog_id, step = %state.step, "Dialog finished");
                state.pending_prompt = None;
                turn.status = DialogStatus::Complete;
            }
        }
    }

    fn branch(
        &self,
        state: &mut TurnState,
        portfolio: &Portfolio,
        answer: Reply,
        turn: &mut Turn,
    ) -> Next {
        let Reply::Choice(index) = answer else {
            return Next::Repeat(None);
        };
        let Some(option) = MenuOption::ALL.get(index).copied() else {
            return Next::Repeat(None);
        };
        state.selected_option = Some(option);
        debug!(option = option.label(), "Menu option selected");

        match option {
            MenuOption::Portfolio => {
                turn.say(render::PORTFOLIO_INTRO);
                turn.say(portfolio.show());
                Next::End
            }
            MenuOption::Trade => {
                turn.say(render::TRADE_INTRO);
                Next::Advance(Prompt::text(render::TRADE_PROMPT))
            }
            MenuOption::Help => {
                turn.say(render::HELP_TEXT);
                Next::End
            }
        }
    }

    fn parse_intent(
        &self,
        state: &mut TurnState,
        portfolio: &Portfolio,
        answer: Reply,
        turn: &mut Turn,
    ) -> Result<Next> {
        let Reply::Text(text) = answer else {
            return Ok(Next::Repeat(None));
        };
        state.pending_input = Some(text.clone());

        let entities = self.recognizer.recognize(&text, &self.locale);
        let intent = TradeIntent::parse(&text, &entities, &self.catalog);
        let show_time = intent.timestamp.is_some();

        let mut operation = match intent.into_operation(&text) {
            Ok(operation) => operation,
            Err(TradeError::UnknownTicker(_)) => {
                return Ok(Next::Repeat(Some(self.unknown_stock_message(&text))));
            }
            Err(TradeError::ParseAmbiguous(_)) => {
                return Ok(Next::Repeat(Some(
                    "Please tell me whether you want to buy or sell.".to_string(),
                )));
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = check_position(portfolio, &operation) {
            return Ok(Next::Repeat(Some(format!("You cannot place that order. {e}."))));
        }

        let decimals = self.pricing.decimals;
        let priced = operation.gross_amount().and_then(|amount| match amount {
            Some(amount) => self.pricing.quote(amount).map(|cost| Some((amount, cost))),
            None => Ok(None),
        });
        match priced {
            Ok(Some((amount, cost))) => operation.apply_cost(amount, &cost),
            Ok(None) => debug!(
                error = %TradeError::ParseAmbiguous(text.clone()),
                "Totals skipped"
            ),
            Err(TradeError::InvalidAmount(reason)) => {
                debug!(%reason, "Order out of range");
                return Ok(Next::Repeat(Some(format!(
                    "That order is too large for me to price ({reason})."
                ))));
            }
            Err(e) => return Err(e),
        }

        turn.say(render::order_summary(&operation, show_time, decimals));
        let question = render::confirmation_question(&operation, show_time, decimals);
        state.pending_operation = Some(operation);
        Ok(Next::Advance(Prompt::confirm(question)))
    }

    async fn confirm(
        &self,
        state: &mut TurnState,
        portfolio: &mut Portfolio,
        answer: Reply,
        turn: &mut Turn,
    ) -> Result<Next> {
        let Reply::Confirm(accepted) = answer else {
            return Ok(Next::Repeat(None));
        };

        if !accepted {
            let input = state.pending_input.as_deref().unwrap_or_default();
            turn.say(render::not_understood(input));
            turn.say(render::STILL_LEARNING);
            state.pending_operation = None;
            return Ok(Next::End);
        }

        let mut operation = state
            .pending_operation
            .take()
            .ok_or_else(|| TradeError::StateError("no operation awaiting confirmation".into()))?;

        if operation.status != OperationStatus::Pending {
            turn.say(
                "Your order is missing its quantity or price, so I did not send it to the broker.",
            );
            return Ok(Next::End);
        }

        if let Err(e) = check_position(portfolio, &operation) {
            turn.say(format!("You cannot place that order. {e}."));
            return Ok(Next::End);
        }

        operation.status = OperationStatus::InProgress;
        let receipt = self.broker.submit(&operation).await;
        if !receipt.is_success() {
            operation.status = OperationStatus::Failure;
            let error = TradeError::BrokerFailure(receipt.errors.join("; "));
            warn!(ticker = %operation.stock.ticker, %error, "Order rejected");
            turn.say(format!("{error}. Your portfolio was not changed."));
            return Ok(Next::End);
        }

        portfolio.upsert(&operation)?;
        operation.status = OperationStatus::Success;
        info!(
            ticker = %operation.stock.ticker,
            kind = %operation.kind,
            quantity = ?operation.quantity,
            total = ?operation.total(),
            "Operation executed"
        );

        turn.say(render::EXECUTED);
        turn.show(render::receipt_card(
            &operation,
            self.broker.name(),
            receipt.transaction_id.as_deref(),
            self.pricing.decimals,
        ));
        portfolio.record(operation);
        turn.portfolio_changed = true;
        Ok(Next::End)
    }

    fn unknown_stock_message(&self, text: &str) -> String {
        let known: Vec<&str> = self
            .catalog
            .stocks()
            .iter()
            .map(|s| s.ticker.as_str())
            .collect();
        let unknown = self.catalog.unknown_symbols(text);
        if unknown.is_empty() {
            format!(
                "I could not tell which stock you mean. I can trade {}.",
                known.join(", ")
            )
        } else {
            format!(
                "I don't know {}. I can trade {}.",
                unknown.join(", "),
                known.join(", ")
            )
        }
    }
}

/// Whether the holdings can absorb the operation: no oversell, no position
/// beyond range
fn check_position(portfolio: &Portfolio, operation: &Operation) -> Result<()> {
    let Some(quantity) = operation.quantity else {
        return Ok(());
    };
    let ticker = &operation.stock.ticker;
    match (operation.kind, operation.unit_price) {
        (OperationKind::Sell, _) => portfolio.check_sell(ticker, quantity),
        (OperationKind::Buy, Some(price)) => portfolio.check_buy(ticker, quantity, price),
        (OperationKind::Buy, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{BrokerReceipt, PaperBroker};
    use crate::interface::PromptKind;
    use crate::model::{Market, Stock};
    use crate::recognizer::{
        CurrencyUnit, Entity, EntityKind, MockEntityRecognizer, Resolution, RuleRecognizer,
    };
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct RejectingBroker;

    #[async_trait]
    impl Broker for RejectingBroker {
        fn name(&self) -> &str {
            "Closed Broker"
        }

        async fn submit(&self, _operation: &Operation) -> BrokerReceipt {
            BrokerReceipt::failure(vec!["market closed".to_string()])
        }
    }

    fn dialog() -> TradeDialog {
        TradeDialog::new(
            Arc::new(RuleRecognizer::new().unwrap()),
            Arc::new(PaperBroker::default()),
        )
    }

    fn texts(turn: &Turn) -> Vec<String> {
        turn.activities
            .iter()
            .filter_map(|a| match a {
                Activity::Text(t) => Some(t.clone()),
                Activity::Prompt(p) => Some(p.text.clone()),
                Activity::Card(_) => None,
            })
            .collect()
    }

    async fn drive(
        dialog: &TradeDialog,
        portfolio: &mut Portfolio,
        replies: &[&str],
    ) -> (TurnState, Turn) {
        let mut state = TurnState::new();
        let mut turn = dialog.begin(&mut state);
        for &reply in replies {
            turn = dialog.resume(&mut state, portfolio, Some(reply)).await;
        }
        (state, turn)
    }

    #[test]
    fn test_begin_offers_menu() {
        let mut state = TurnState::new();
        let turn = dialog().begin(&mut state);

        assert_eq!(state.step, DialogStep::Branch);
        assert_eq!(turn.status, DialogStatus::Waiting);
        let Some(Activity::Prompt(prompt)) = turn.activities.last() else {
            panic!("expected a prompt");
        };
        assert_eq!(prompt.text, "Welcome! What can I help you with?");
        assert_eq!(
            prompt.kind,
            PromptKind::Choice(vec!["Portfolio".into(), "Trade".into(), "Help".into()])
        );
    }

    #[tokio::test]
    async fn test_portfolio_branch() {
        let mut portfolio = Portfolio::new();
        let (state, turn) = drive(&dialog(), &mut portfolio, &["Portfolio"]).await;

        assert!(turn.is_complete());
        assert_eq!(state.selected_option, Some(MenuOption::Portfolio));
        assert_eq!(
            texts(&turn),
            vec!["Very well, this is your portfolio.", "Portfolio Empty."]
        );
    }

    #[tokio::test]
    async fn test_help_branch() {
        let mut portfolio = Portfolio::new();
        let (_, turn) = drive(&dialog(), &mut portfolio, &["3"]).await;

        assert!(turn.is_complete());
        assert!(texts(&turn)[0].starts_with("Some day"));
    }

    #[tokio::test]
    async fn test_trade_prompts_for_order() {
        let mut portfolio = Portfolio::new();
        let (state, turn) = drive(&dialog(), &mut portfolio, &["trade"]).await;

        assert_eq!(state.step, DialogStep::ParseIntent);
        assert_eq!(
            texts(&turn),
            vec!["Ok, you want to trade.", "What do you want to buy or sell?"]
        );
    }

    #[tokio::test]
    async fn test_parse_intent_prices_order() {
        let mut portfolio = Portfolio::new();
        let (state, turn) =
            drive(&dialog(), &mut portfolio, &["Trade", "Buy 25 MSFT for $120"]).await;

        assert_eq!(state.step, DialogStep::Confirm);
        let op = state.pending_operation.as_ref().unwrap();
        assert_eq!(op.status, OperationStatus::Pending);
        assert_eq!(op.amount, Some(dec!(3000)));
        assert_eq!(op.commission, Some(dec!(15.00)));
        assert_eq!(op.tax, Some(dec!(0.15)));
        assert_eq!(op.total(), Some(dec!(3015.15)));

        let texts = texts(&turn);
        assert!(texts[0].contains("Total: $ 3015.15"));
        assert_eq!(texts[1], "Do you wish to buy 25 MSFT stocks at $ 120.00?");
        assert!(portfolio.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_yes_executes() {
        let mut portfolio = Portfolio::new();
        let (state, turn) = drive(
            &dialog(),
            &mut portfolio,
            &["Trade", "Buy 25 MSFT for $120", "yes"],
        )
        .await;

        assert!(turn.is_complete());
        assert!(turn.portfolio_changed);
        assert!(state.pending_prompt.is_none());
        assert_eq!(texts(&turn), vec!["Operation executed."]);
        assert!(turn.activities.iter().any(|a| matches!(a, Activity::Card(_))));

        let holding = portfolio.holding("MSFT").unwrap();
        assert_eq!(holding.quantity, 25);
        assert_eq!(holding.last_price, dec!(120));
        assert_eq!(portfolio.history.len(), 1);
        assert_eq!(portfolio.history[0].status, OperationStatus::Success);
    }

    #[tokio::test]
    async fn test_confirm_no_leaves_portfolio() {
        let mut portfolio = Portfolio::new();
        let (_, turn) = drive(
            &dialog(),
            &mut portfolio,
            &["Trade", "Buy 25 MSFT for $120", "no"],
        )
        .await;

        assert!(turn.is_complete());
        assert!(!turn.portfolio_changed);
        assert_eq!(
            texts(&turn),
            vec![
                "I'm sorry I did not understand your order: 'Buy 25 MSFT for $120'",
                "I am still learning, you know?",
            ]
        );
        assert!(portfolio.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_incomplete_order_skips_broker() {
        let mut portfolio = Portfolio::new();
        let (_, turn) = drive(&dialog(), &mut portfolio, &["Trade", "buy 5 MSFT", "yes"]).await;

        assert!(turn.is_complete());
        assert!(!turn.portfolio_changed);
        assert!(texts(&turn)[0].contains("missing its quantity or price"));
        assert!(portfolio.is_empty());
    }

    #[tokio::test]
    async fn test_broker_failure_no_mutation() {
        let dialog = TradeDialog::new(
            Arc::new(RuleRecognizer::new().unwrap()),
            Arc::new(RejectingBroker),
        );
        let mut portfolio = Portfolio::new();
        let (_, turn) = drive(&dialog, &mut portfolio, &["Trade", "Buy 2 FB at $10", "y"]).await;

        assert!(turn.is_complete());
        assert!(!turn.portfolio_changed);
        assert!(texts(&turn)[0].contains("market closed"));
        assert!(portfolio.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ticker_reprompts() {
        let mut portfolio = Portfolio::new();
        let (state, turn) =
            drive(&dialog(), &mut portfolio, &["Trade", "buy 5 ACME at $3"]).await;

        assert_eq!(state.step, DialogStep::ParseIntent);
        assert_eq!(state.retries, 1);
        let texts = texts(&turn);
        assert!(texts[0].starts_with("I don't know ACME"));
        assert_eq!(texts[1], "What do you want to buy or sell?");
    }

    #[tokio::test]
    async fn test_oversell_reprompts() {
        let mut portfolio = Portfolio::new();
        let (state, turn) =
            drive(&dialog(), &mut portfolio, &["Trade", "sell 5 MSFT at $3"]).await;

        assert_eq!(state.step, DialogStep::ParseIntent);
        assert!(texts(&turn)[0].contains("Insufficient holdings of MSFT"));
    }

    #[tokio::test]
    async fn test_unmatched_choice_retries_then_ends() {
        let mut portfolio = Portfolio::new();
        let dialog = dialog();
        let mut state = TurnState::new();
        dialog.begin(&mut state);

        let turn = dialog.resume(&mut state, &mut portfolio, Some("banana")).await;
        assert_eq!(turn.status, DialogStatus::Waiting);
        assert!(turn.activities.iter().any(|a| matches!(a, Activity::Prompt(p) if p.text.starts_with("Sorry, I didn't get that"))));

        dialog.resume(&mut state, &mut portfolio, None).await;
        let turn = dialog.resume(&mut state, &mut portfolio, Some("??")).await;
        assert!(turn.is_complete());
        assert_eq!(texts(&turn), vec![render::TOO_MANY_RETRIES]);
    }

    #[tokio::test]
    async fn test_valid_reply_resets_retries() {
        let mut portfolio = Portfolio::new();
        let (state, _) = drive(&dialog(), &mut portfolio, &["nope", "Trade"]).await;
        assert_eq!(state.step, DialogStep::ParseIntent);
        assert_eq!(state.retries, 0);
    }

    #[tokio::test]
    async fn test_recognizer_called_with_locale() {
        let mut recognizer = MockEntityRecognizer::new();
        recognizer
            .expect_recognize()
            .withf(|text, locale| text.starts_with("compra") && *locale == Locale::Spanish)
            .times(1)
            .returning(|_, _| {
                vec![
                    Entity::new(
                        EntityKind::Number,
                        "3",
                        7,
                        8,
                        Some(Resolution::Number(dec!(3))),
                    ),
                    Entity::new(
                        EntityKind::Currency,
                        "40 €",
                        18,
                        24,
                        Some(Resolution::Currency {
                            value: dec!(40),
                            unit: CurrencyUnit::Euro,
                        }),
                    ),
                    Entity::new(
                        EntityKind::Number,
                        "40",
                        18,
                        20,
                        Some(Resolution::Number(dec!(40))),
                    ),
                ]
            });

        let dialog = TradeDialog::new(Arc::new(recognizer), Arc::new(PaperBroker::default()))
            .with_locale(Locale::Spanish);
        let mut portfolio = Portfolio::new();
        let (state, _) = drive(
            &dialog,
            &mut portfolio,
            &["Trade", "compra 3 MSFT buy 40 €"],
        )
        .await;

        let op = state.pending_operation.unwrap();
        assert_eq!(op.quantity, Some(3));
        assert_eq!(op.unit_price, Some(dec!(40)));
        // 0.60 commission, 0.006 tax rounds up to 0.01
        assert_eq!(op.total(), Some(dec!(120.61)));
    }

    #[tokio::test]
    async fn test_every_path_terminates() {
        let scripts: &[&[&str]] = &[
            &["Portfolio"],
            &["Help"],
            &["Trade", "Buy 1 MSFT at $1", "yes"],
            &["Trade", "Buy 1 MSFT at $1", "no"],
            &["x", "x", "x"],
            &["Trade", "x", "x", "x"],
            &["Trade", "Buy 1 MSFT at $1", "x", "x", "x"],
        ];

        for script in scripts {
            let mut portfolio = Portfolio::new();
            let (_, turn) = drive(&dialog(), &mut portfolio, script).await;
            assert!(turn.is_complete(), "{script:?}");
        }
    }

    #[tokio::test]
    async fn test_stored_state_at_options_restarts() {
        let mut portfolio = Portfolio::new();
        let dialog = dialog();
        let mut state = TurnState::new();
        state.pending_prompt = Some(Prompt::choice(render::WELCOME_PROMPT, MenuOption::labels()));
        state.retries = 2;

        let turn = dialog.resume(&mut state, &mut portfolio, Some("Trade")).await;

        assert_eq!(turn.status, DialogStatus::Waiting);
        assert_eq!(state.step, DialogStep::Branch);
        assert_eq!(state.retries, 0);
        assert_eq!(texts(&turn), vec![render::WELCOME_PROMPT]);
    }

    #[tokio::test]
    async fn test_oversized_order_reprompts() {
        let mut portfolio = Portfolio::new();
        let (state, turn) = drive(
            &dialog(),
            &mut portfolio,
            &["Trade", "Buy 18446744073709551615 MSFT at $100000000000"],
        )
        .await;

        assert_eq!(state.step, DialogStep::ParseIntent);
        assert!(state.pending_operation.is_none());
        let texts = texts(&turn);
        assert!(texts[0].starts_with("That order is too large for me to price"));
        assert_eq!(texts[1], render::TRADE_PROMPT);
    }

    #[tokio::test]
    async fn test_position_limit_checked_again_on_confirm() {
        let mut portfolio = Portfolio::new();
        let dialog = dialog();
        let (mut state, _) =
            drive(&dialog, &mut portfolio, &["Trade", "buy 1 MSFT at $1"]).await;
        assert_eq!(state.step, DialogStep::Confirm);

        // the holding grew while the order waited for confirmation
        let filler = Operation::new(
            Stock::new("MSFT", "Microsoft", Market::Nasdaq),
            OperationKind::Buy,
        )
        .with_quantity(u64::MAX)
        .with_unit_price(dec!(1));
        portfolio.upsert(&filler).unwrap();

        let turn = dialog.resume(&mut state, &mut portfolio, Some("yes")).await;
        assert!(turn.is_complete());
        assert!(!turn.portfolio_changed);
        assert!(texts(&turn)[0].contains("Position in MSFT is too large"));
        assert_eq!(portfolio.held_quantity("MSFT"), u64::MAX);
        assert!(portfolio.history.is_empty());
    }

    #[test]
    fn test_stock_catalog_is_configurable() {
        let mut catalog = SymbolCatalog::empty();
        catalog.register(Stock::new("ACME", "Acme", Market::Nyse), &[]);
        let dialog = dialog().with_catalog(catalog);
        assert_eq!(dialog.catalog().stocks().len(), 1);
    }
}
