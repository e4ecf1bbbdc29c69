//! Chat sessions: messages, the repository interface and its in-memory backing.
//!
//! Sessions live for the lifetime of the process and are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One immutable entry in a session's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: &str, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_owned(),
            role,
            content: content.into(),
            ingredients: None,
            images: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: Option<Vec<String>>) -> Self {
        self.ingredients = ingredients;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Held while a writer appends a user message and its reply.
///
/// Dropping the guard lets the next writer for the same session proceed.
pub type SessionWriteGuard = OwnedMutexGuard<()>;

/// Storage for chat sessions.
///
/// Implement this trait to move sessions into a durable store without
/// touching the chat service or the HTTP handlers.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create an empty session with a fresh identifier.
    async fn create(&self) -> ChatSession;

    async fn get(&self, chat_id: &str) -> Result<ChatSession, ChatError>;

    /// Messages of `chat_id` in arrival order.
    async fn history(&self, chat_id: &str) -> Result<Vec<Message>, ChatError>;

    async fn append(&self, chat_id: &str, message: Message) -> Result<(), ChatError>;

    /// Acquire the per-session writer lock.
    async fn lock(&self, chat_id: &str) -> Result<SessionWriteGuard, ChatError>;
}

struct SessionSlot {
    session: ChatSession,
    writer: Arc<Mutex<()>>,
    messages: RwLock<Vec<Message>>,
}

/// Process-lifetime session map.
///
/// The map and each message list sit behind `std::sync::RwLock`s that are
/// only held for non-await sections; the async per-session `writer` mutex
/// serialises whole exchanges without blocking history reads.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Arc<SessionSlot>>>,
}

impl std::fmt::Debug for InMemorySessionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.sessions.read().map(|s| s.len()).unwrap_or(0);
        write!(f, "InMemorySessionRepository({count} sessions)")
    }
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, chat_id: &str) -> Result<Arc<SessionSlot>, ChatError> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions
            .get(chat_id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(chat_id.to_owned()))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self) -> ChatSession {
        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        let slot = Arc::new(SessionSlot {
            session: session.clone(),
            writer: Arc::new(Mutex::new(())),
            messages: RwLock::new(Vec::new()),
        });
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(session.id.clone(), slot);
        session
    }

    async fn get(&self, chat_id: &str) -> Result<ChatSession, ChatError> {
        Ok(self.slot(chat_id)?.session.clone())
    }

    async fn history(&self, chat_id: &str) -> Result<Vec<Message>, ChatError> {
        let slot = self.slot(chat_id)?;
        let messages = slot
            .messages
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(messages.clone())
    }

    async fn append(&self, chat_id: &str, message: Message) -> Result<(), ChatError> {
        let slot = self.slot(chat_id)?;
        slot.messages
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
        Ok(())
    }

    async fn lock(&self, chat_id: &str) -> Result<SessionWriteGuard, ChatError> {
        let writer = Arc::clone(&self.slot(chat_id)?.writer);
        Ok(writer.lock_owned().await)
    }
}
