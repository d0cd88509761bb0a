//! Outbound activities
//!
//! The dialog never formats for a platform. It emits activities: plain
//! text, a receipt card, or a prompt that suspends the dialog until the
//! user replies.

use serde::{Deserialize, Serialize};

/// How a prompt expects to be answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    /// Pick one of the listed choices
    Choice(Vec<String>),
    /// Free text
    Text,
    /// Yes or no
    Confirm,
}

/// A question the user must answer before the dialog continues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub kind: PromptKind,
}

impl Prompt {
    pub fn choice<I, S>(text: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            kind: PromptKind::Choice(choices.into_iter().map(Into::into).collect()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: PromptKind::Text,
        }
    }

    pub fn confirm(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: PromptKind::Confirm,
        }
    }
}

/// Key/value line on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub key: String,
    pub value: String,
}

impl Fact {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Priced line on a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub title: String,
    pub price: String,
    pub quantity: String,
}

/// Summary of an executed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptCard {
    pub title: String,
    pub facts: Vec<Fact>,
    pub items: Vec<ReceiptItem>,
    pub tax: String,
    pub total: String,
}

/// One unit of bot output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Text(String),
    Card(ReceiptCard),
    Prompt(Prompt),
}

impl Activity {
    pub fn text(text: impl Into<String>) -> Self {
        Activity::Text(text.into())
    }
}

/// Everything the bot sends back for one inbound message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotResponse {
    pub activities: Vec<Activity>,
}

impl BotResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let mut response = Self::new();
        response.push(Activity::text(text));
        response
    }

    pub fn push(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    pub fn extend(&mut self, activities: impl IntoIterator<Item = Activity>) {
        self.activities.extend(activities);
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Text of all text activities and prompts, one per line
    pub fn text(&self) -> String {
        self.activities
            .iter()
            .filter_map(|activity| match activity {
                Activity::Text(text) => Some(text.as_str()),
                Activity::Prompt(prompt) => Some(prompt.text.as_str()),
                Activity::Card(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The prompt the dialog is waiting on, if any
    pub fn prompt(&self) -> Option<&Prompt> {
        self.activities.iter().rev().find_map(|activity| match activity {
            Activity::Prompt(prompt) => Some(prompt),
            _ => None,
        })
    }

    pub fn card(&self) -> Option<&ReceiptCard> {
        self.activities.iter().find_map(|activity| match activity {
            Activity::Card(card) => Some(card),
            _ => None,
        })
    }
}
