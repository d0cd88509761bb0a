//! Conversation-scoped state

use crate::bot::conversation::Transcript;
use crate::dialog::TurnState;
use crate::model::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Everything the bot remembers about one conversation between messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub conversation_id: String,
    /// Active dialog, `None` between dialogs
    pub dialog: Option<TurnState>,
    pub transcript: Transcript,
    /// Orders confirmed during this session, oldest first
    #[serde(default)]
    pub orders: Vec<Operation>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(conversation_id: impl Into<String>, max_history: usize) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: conversation_id.into(),
            dialog: None,
            transcript: Transcript::new(max_history),
            orders: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        let max_age = chrono::Duration::seconds(max_age_seconds);
        Utc::now() - self.last_active > max_age
    }
}

/// Keyed storage of conversation sessions
pub trait ConversationStore: Send + Sync {
    fn get(&self, conversation_id: &str) -> Option<ConversationSession>;
    fn set(&self, session: ConversationSession);
    fn cleanup_expired(&self, max_age_seconds: i64) -> usize;
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<String, ConversationSession>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn get(&self, conversation_id: &str) -> Option<ConversationSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
            .cloned()
    }

    fn set(&self, session: ConversationSession) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.conversation_id.clone(), session);
    }

    fn cleanup_expired(&self, max_age_seconds: i64) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let initial_count = sessions.len();
        sessions.retain(|_, session| !session.is_expired(max_age_seconds));
        initial_count - sessions.len()
    }
}
