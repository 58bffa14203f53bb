//! In-memory conversation sessions
//!
//! A [`Session`] owns both the ordered turn history and the evaluation
//! records of a conversation, so the two are always created and destroyed
//! together. Each session sits behind its own async mutex: a request holds it
//! for its whole duration, which serializes concurrent writers to the same
//! session while other sessions proceed independently.
//!
//! Sessions live until explicitly cleared. Nothing expires them; only the
//! optional turn cap bounds a session's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::evaluation::Evaluation;

/// Turns rendered into a generation prompt by default
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Prefix used when rendering conversation context
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A conversation thread
#[derive(Debug)]
pub struct Session {
    id: String,
    turns: Vec<Turn>,
    evaluations: Vec<Evaluation>,
    max_turns: Option<usize>,
    created_at: DateTime<Utc>,
}

impl Session {
    fn new(id: String, max_turns: Option<usize>) -> Self {
        Self {
            id,
            turns: Vec::new(),
            evaluations: Vec::new(),
            max_turns,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// Append a turn, dropping the oldest ones beyond the cap
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });

        if let Some(max) = self.max_turns {
            if self.turns.len() > max {
                let excess = self.turns.len() - max;
                self.turns.drain(..excess);
            }
        }
    }

    pub fn push_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluations.push(evaluation);
    }

    /// Last `window` turns as `User: ...` / `Assistant: ...` lines, oldest first
    pub fn recent_context(&self, window: usize) -> String {
        let start = self.turns.len().saturating_sub(window);
        self.turns[start..]
            .iter()
            .map(|turn| format!("{}: {}\n", turn.role.label(), turn.content))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            created_at: self.created_at,
            turns: self.turns.clone(),
            evaluations: self.evaluations.clone(),
        }
    }
}

/// Read-only copy of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
    pub evaluations: Vec<Evaluation>,
}

/// Shared handle to a locked session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Session registry keyed by opaque session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_turns: Option<usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sessions keep at most `max_turns` turns
    pub fn with_max_turns(max_turns: Option<usize>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
        }
    }

    /// Resolve `session_id` to a session, creating it when unknown.
    /// A missing or blank id gets a freshly generated one.
    pub async fn get_or_create(&self, session_id: Option<&str>) -> (String, SessionHandle) {
        let id = session_id
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Some(handle) = self.sessions.read().await.get(&id) {
            return (id, handle.clone());
        }

        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::info!(session_id = %id, "Session created");
                Arc::new(Mutex::new(Session::new(id.clone(), self.max_turns)))
            })
            .clone();
        (id, handle)
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Append a turn to an existing session; false if the session is unknown
    pub async fn append_turn(&self, session_id: &str, role: Role, content: &str) -> bool {
        match self.get(session_id).await {
            Some(handle) => {
                handle.lock().await.append_turn(role, content);
                true
            }
            None => false,
        }
    }

    /// Rendered context of a session; empty for unknown or empty sessions
    pub async fn recent_context(&self, session_id: &str, window: usize) -> String {
        match self.get(session_id).await {
            Some(handle) => handle.lock().await.recent_context(window),
            None => String::new(),
        }
    }

    /// Remove a session with its history and evaluations. Idempotent.
    pub async fn clear(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "Session cleared");
        }
        removed
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_ids_are_distinct() {
        let store = SessionStore::new();
        let (a, _) = store.get_or_create(None).await;
        let (b, _) = store.get_or_create(None).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_blank_id_is_treated_as_absent() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(Some("  ")).await;
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_explicit_id_shares_history() {
        let store = SessionStore::new();
        let (a, _) = store.get_or_create(Some("debat-42")).await;
        assert!(store.append_turn(&a, Role::User, "premier").await);

        let (b, handle) = store.get_or_create(Some("debat-42")).await;
        assert_eq!(a, b);
        handle.lock().await.append_turn(Role::Assistant, "réponse");

        let session = handle.lock().await;
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0], Turn::user("premier"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_recent_context_window() {
        let store = SessionStore::new();
        let (id, handle) = store.get_or_create(None).await;
        {
            let mut session = handle.lock().await;
            for i in 0..12 {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                session.append_turn(role, format!("m{}", i));
            }
        }

        let context = store.recent_context(&id, DEFAULT_CONTEXT_WINDOW).await;
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "User: m2");
        assert_eq!(lines[1], "Assistant: m3");
        assert_eq!(lines[9], "Assistant: m11");
        assert!(context.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_recent_context_empty() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(None).await;
        assert_eq!(store.recent_context(&id, 10).await, "");
        assert_eq!(store.recent_context("inconnu", 10).await, "");
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = SessionStore::new();
        let (id, handle) = store.get_or_create(None).await;
        handle
            .lock()
            .await
            .push_evaluation(Evaluation::fallback("argument"));

        assert!(store.clear(&id).await);
        assert!(!store.contains(&id).await);
        assert!(!store.clear(&id).await);
        assert!(!store.clear("jamais-vu").await);
        assert!(store.is_empty().await);

        // A cleared id starts over with empty history and evaluations
        let (_, handle) = store.get_or_create(Some(&id)).await;
        let session = handle.lock().await;
        assert!(session.turns().is_empty());
        assert!(session.evaluations().is_empty());
    }

    #[tokio::test]
    async fn test_append_to_unknown_session() {
        let store = SessionStore::new();
        assert!(!store.append_turn("absent", Role::User, "x").await);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_turn_cap_drops_oldest() {
        let mut session = Session::new("s".to_string(), Some(4));
        for i in 0..6 {
            session.append_turn(Role::User, format!("m{}", i));
        }
        assert_eq!(session.turns().len(), 4);
        assert_eq!(session.turns()[0].content, "m2");
    }
}
