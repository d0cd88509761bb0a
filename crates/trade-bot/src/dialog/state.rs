//! Per-conversation dialog state

use crate::interface::Prompt;
use crate::model::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The step that consumes the next reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogStep {
    /// Present the main menu
    Options,
    /// Act on the chosen menu option
    Branch,
    /// Read a trade order from free text
    ParseIntent,
    /// Execute or drop the parsed order
    Confirm,
}

impl DialogStep {
    /// Step after this one has consumed a valid reply, `None` at the end
    pub fn next(self, option: Option<MenuOption>) -> Option<DialogStep> {
        match (self, option) {
            (DialogStep::Options, _) => Some(DialogStep::Branch),
            (DialogStep::Branch, Some(MenuOption::Trade)) => Some(DialogStep::ParseIntent),
            (DialogStep::ParseIntent, _) => Some(DialogStep::Confirm),
            (DialogStep::Branch | DialogStep::Confirm, _) => None,
        }
    }
}

impl fmt::Display for DialogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogStep::Options => "options",
            DialogStep::Branch => "branch",
            DialogStep::ParseIntent => "parse_intent",
            DialogStep::Confirm => "confirm",
        };
        write!(f, "{name}")
    }
}

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuOption {
    Portfolio,
    Trade,
    Help,
}

impl MenuOption {
    pub const ALL: [MenuOption; 3] = [MenuOption::Portfolio, MenuOption::Trade, MenuOption::Help];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Portfolio => "Portfolio",
            MenuOption::Trade => "Trade",
            MenuOption::Help => "Help",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|o| o.label().to_string()).collect()
    }
}

/// Values carried between the steps of one dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub dialog_id: String,
    pub step: DialogStep,
    pub selected_option: Option<MenuOption>,
    /// Raw trade text as the user typed it
    pub pending_input: Option<String>,
    pub pending_operation: Option<Operation>,
    /// Last prompt sent, re-issued when a reply does not match it
    pub pending_prompt: Option<Prompt>,
    /// Consecutive replies that did not satisfy the pending prompt
    pub retries: u32,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl TurnState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            dialog_id: uuid::Uuid::new_v4().to_string(),
            step: DialogStep::Options,
            selected_option: None,
            pending_input: None,
            pending_operation: None,
            pending_prompt: None,
            retries: 0,
            started_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Whether the dialog has been idle for longer than `idle`
    pub fn is_expired(&self, idle: Duration) -> bool {
        let Ok(idle) = chrono::Duration::from_std(idle) else {
            return false;
        };
        Utc::now() - self.last_active > idle
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
