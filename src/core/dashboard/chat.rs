use async_trait::async_trait;
use std::time::Duration;

use crate::core::error::{DashResult, DashboardError};
use crate::core::models::{ChatMessage, ChatRole, cmp_loose_datetime};
use crate::core::store::DataStore;

/// Source of assistant replies to a sent message.
///
/// Real replies come from the agent runtime; the dashboard only needs
/// something that eventually yields an assistant message (or nothing).
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn reply(&self, prompt: &ChatMessage) -> DashResult<Option<ChatMessage>>;
}

/// Stand-in generator: waits a fixed delay, then answers with a canned
/// acknowledgement.
pub struct PlaceholderReply {
    delay: Duration,
    text: String,
}

impl PlaceholderReply {
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
        }
    }
}

#[async_trait]
impl ReplyGenerator for PlaceholderReply {
    async fn reply(&self, _prompt: &ChatMessage) -> DashResult<Option<ChatMessage>> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(ChatMessage::assistant(self.text.clone())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub role: ChatRole,
    pub message: String,
    pub timestamp: String,
    pub pending: bool,
}

pub struct ChatManager {
    store: DataStore<ChatMessage>,
}

impl ChatManager {
    pub fn new() -> Self {
        Self {
            store: DataStore::new(),
        }
    }

    /// Local half of `send`: reject blank input, append the user message
    /// immediately. The caller persists it and requests a reply.
    pub fn stage_send(&mut self, text: &str) -> DashResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DashboardError::validation("Message cannot be empty"));
        }
        let message = ChatMessage::user(text);
        self.store.push_optimistic(message.clone());
        Ok(message)
    }

    /// Replies are never persisted: they stay client-side across reloads
    /// and are not shown as pending.
    pub fn append_reply(&mut self, reply: ChatMessage) {
        self.store.push_local(reply);
    }

    pub fn settle(&mut self, key: &str) -> bool {
        self.store.settle(key)
    }

    pub fn rollback(&mut self, key: &str) -> bool {
        self.store.rollback(key)
    }

    pub fn apply_list(&mut self, fetched: Vec<ChatMessage>) {
        self.store.reconcile(fetched);
    }

    /// History in timestamp order; equal timestamps keep arrival order.
    pub fn messages(&self) -> Vec<&ChatMessage> {
        let mut sorted: Vec<&ChatMessage> = self.store.items().iter().collect();
        sorted.sort_by(|a, b| cmp_loose_datetime(&a.timestamp, &b.timestamp));
        sorted
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn view(&self) -> Vec<ChatLine> {
        use crate::core::store::Record;
        self.messages()
            .into_iter()
            .map(|m| ChatLine {
                role: m.role,
                message: m.message.clone(),
                timestamp: m.timestamp.clone(),
                pending: self.store.is_pending(&m.key()),
            })
            .collect()
    }
}

impl Default for ChatManager {
    fn default() -> Self {
        Self::new()
    }
}
