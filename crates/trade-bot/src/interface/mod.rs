//! Bot platform interfaces
//!
//! Platform-agnostic output types, their formatting, and conversation
//! session storage.

pub mod activity;
pub mod formatter;
pub mod session;

pub use activity::{Activity, BotResponse, Fact, Prompt, PromptKind, ReceiptCard, ReceiptItem};
pub use formatter::{BotPlatform, CliFormatter, Formatter, FormatterFactory, MarkdownFormatter};
pub use session::{ConversationSession, ConversationStore, InMemoryConversationStore};
