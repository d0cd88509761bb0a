//! Conversation transcript
//!
//! Keeps the most recent exchanges of a conversation, oldest dropped first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of exchanges kept
pub const MAX_HISTORY_SIZE: usize = 50;

/// One user message and the bot's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user_input: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    pub fn new(user_input: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            bot_response: bot_response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded history of exchanges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    history: VecDeque<Exchange>,
    max_history: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl Transcript {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_history.min(MAX_HISTORY_SIZE)),
            max_history,
        }
    }

    /// Record an exchange, trimming the oldest past the limit
    pub fn push(&mut self, user_input: impl Into<String>, bot_response: impl Into<String>) {
        self.history.push_back(Exchange::new(user_input, bot_response));
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<Exchange> {
        &self.history
    }

    /// Newest first
    pub fn last(&self, n: usize) -> Vec<&Exchange> {
        self.history.iter().rev().take(n).collect()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_trim() {
        let mut transcript = Transcript::new(2);
        transcript.push("hi", "Welcome!");
        transcript.push("trade", "Ok, you want to trade.");
        transcript.push("buy 1 FB", "Do you wish...");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.history()[0].user_input, "trade");
        assert_eq!(transcript.last(1)[0].user_input, "buy 1 FB");
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::default();
        transcript.push("hi", "Welcome!");
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
