//! Slash commands that bypass the dialog

use crate::error::{Result, TradeError};

/// Parsed user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drop the active dialog
    Cancel,
    /// Show holdings without entering the dialog
    Portfolio,
    /// Show command help
    Help,
    /// Show this session's confirmed orders
    History,
    /// Leave the bot
    Exit,
    /// Anything else; a reply for the dialog
    Message { text: String },
}

impl Command {
    /// Parse user input; text not starting with `/` is a dialog message
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if !input.starts_with('/') {
            return Ok(Command::Message {
                text: input.to_string(),
            });
        }

        let cmd = input[1..]
            .split_whitespace()
            .next()
            .ok_or_else(|| TradeError::CommandError("Empty command".to_string()))?
            .to_lowercase();

        match cmd.as_str() {
            "cancel" | "c" | "reset" => Ok(Command::Cancel),
            "portfolio" | "p" | "holdings" => Ok(Command::Portfolio),
            "help" | "h" | "?" => Ok(Command::Help),
            "history" | "orders" => Ok(Command::History),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(TradeError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
TradeBot Commands
=================

  /portfolio   Show your holdings
  /history     Show orders confirmed in this session
  /cancel      Abandon the current dialog
  /help        Show this help
  /exit        Leave

Anything else is a reply to the bot. Say anything to open the menu, pick
Trade, then describe the order, for example:
  Buy 25 MSFT for $120
  sell 10 Netflix at $301 on 2024-03-01
"
    }
}
