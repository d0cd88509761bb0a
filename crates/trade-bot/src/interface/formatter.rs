//! Rendering activities for a platform

use crate::interface::{Activity, BotResponse, Prompt, PromptKind, ReceiptCard};
use serde::{Deserialize, Serialize};

/// Platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotPlatform {
    /// Command-line interface
    CLI,
    /// Telegram bot (Markdown)
    Telegram,
    /// Web chat (Markdown)
    Web,
}

pub trait Formatter: Send + Sync {
    fn platform(&self) -> BotPlatform;
    fn format_prompt(&self, prompt: &Prompt) -> String;
    fn format_card(&self, card: &ReceiptCard) -> String;
    fn format_error(&self, error: &str) -> String;

    /// Render every activity, separated by blank lines
    fn render(&self, response: &BotResponse) -> String {
        response
            .activities
            .iter()
            .map(|activity| match activity {
                Activity::Text(text) => text.clone(),
                Activity::Card(card) => self.format_card(card),
                Activity::Prompt(prompt) => self.format_prompt(prompt),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub struct CliFormatter;

impl Formatter for CliFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::CLI
    }

    fn format_prompt(&self, prompt: &Prompt) -> String {
        match &prompt.kind {
            PromptKind::Choice(choices) => {
                let mut output = prompt.text.clone();
                for (i, choice) in choices.iter().enumerate() {
                    output.push_str(&format!("\n  {}. {}", i + 1, choice));
                }
                output
            }
            PromptKind::Text => prompt.text.clone(),
            PromptKind::Confirm => format!("{} (yes/no)", prompt.text),
        }
    }

    fn format_card(&self, card: &ReceiptCard) -> String {
        let mut output = format!("=== {} ===", card.title);
        for fact in &card.facts {
            output.push_str(&format!("\n{}: {}", fact.key, fact.value));
        }
        for item in &card.items {
            output.push_str(&format!(
                "\n  {} x{} @ {}",
                item.title, item.quantity, item.price
            ));
        }
        output.push_str(&format!("\nTax: {}\nTotal: {}", card.tax, card.total));
        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {error}")
    }
}

pub struct MarkdownFormatter {
    platform: BotPlatform,
}

impl MarkdownFormatter {
    pub fn new(platform: BotPlatform) -> Self {
        Self { platform }
    }
}

impl Formatter for MarkdownFormatter {
    fn platform(&self) -> BotPlatform {
        self.platform
    }

    fn format_prompt(&self, prompt: &Prompt) -> String {
        match &prompt.kind {
            PromptKind::Choice(choices) => {
                let mut output = format!("*{}*", prompt.text);
                for choice in choices {
                    output.push_str(&format!("\n- {choice}"));
                }
                output
            }
            PromptKind::Text => format!("*{}*", prompt.text),
            PromptKind::Confirm => format!("*{}* _(yes/no)_", prompt.text),
        }
    }

    fn format_card(&self, card: &ReceiptCard) -> String {
        let mut output = format!("*{}*\n", card.title);
        for fact in &card.facts {
            output.push_str(&format!("{}: `{}`\n", fact.key, fact.value));
        }
        output.push_str("```\n");
        for item in &card.items {
            output.push_str(&format!("{} | {} | {}\n", item.title, item.quantity, item.price));
        }
        output.push_str("```\n");
        output.push_str(&format!("Tax: {}\n*Total: {}*", card.tax, card.total));
        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ *Error:* {error}")
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(platform: BotPlatform) -> Box<dyn Formatter> {
        match platform {
            BotPlatform::CLI => Box::new(CliFormatter),
            BotPlatform::Telegram | BotPlatform::Web => Box::new(MarkdownFormatter::new(platform)),
        }
    }
}
