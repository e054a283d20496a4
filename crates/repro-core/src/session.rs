//! In-memory session store keyed by session id.
//!
//! The store is owned by the caller (gateway state or REPL) and handed to the engine
//! entry point by reference. Each session holds its own [`ConversationContext`] plus a
//! bounded transcript. Holding a map entry serializes turns within one session while
//! different sessions proceed independently.

use crate::engine::{ConversationContext, ReplyKind, ResponseEngine};
use crate::knowledge::TopicId;
use crate::shared::DEFAULT_HISTORY_LIMIT;
use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Unix timestamp (milliseconds).
    pub timestamp_ms: i64,
}

impl Turn {
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self {
            role,
            content: content.into(),
            timestamp_ms,
        }
    }
}

#[derive(Debug)]
struct Session {
    context: ConversationContext,
    transcript: Vec<Turn>,
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            context: ConversationContext::new(),
            transcript: Vec::new(),
            last_active: Instant::now(),
        }
    }

    fn push_turn(&mut self, turn: Turn, limit: usize) {
        self.transcript.push(turn);
        trim_front(&mut self.transcript, limit);
    }
}

fn trim_front<T>(items: &mut Vec<T>, limit: usize) {
    if items.len() > limit {
        let excess = items.len() - limit;
        items.drain(..excess);
    }
}

/// Reply handed back to the HTTP or terminal collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub kind: ReplyKind,
    pub topic: Option<TopicId>,
}

/// Read-only copy of one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub context: ConversationContext,
    pub transcript: Vec<Turn>,
    pub idle_secs: u64,
}

pub struct SessionStore {
    sessions: DashMap<String, Session>,
    history_limit: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// `history_limit` bounds both the transcript and the recorded utterances (minimum 1).
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            history_limit: history_limit.max(1),
        }
    }

    /// Runs one turn. A missing or empty id creates a session under a fresh UUID;
    /// an unknown id creates a session under that id.
    pub fn converse<R: Rng + ?Sized>(
        &self,
        engine: &ResponseEngine,
        session_id: Option<String>,
        message: &str,
        rng: &mut R,
    ) -> ChatReply {
        let session_id = session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut session = self.sessions.entry(session_id.clone()).or_insert_with(|| {
            tracing::debug!(target: "repro::session", session_id = %session_id, "Session created");
            Session::new()
        });

        session.push_turn(Turn::now(Role::User, message), self.history_limit);
        let reply = engine.respond(message, &mut session.context, rng);
        trim_front(&mut session.context.utterances, self.history_limit);
        session.push_turn(Turn::now(Role::Assistant, reply.text.clone()), self.history_limit);
        session.last_active = Instant::now();

        tracing::info!(
            target: "repro::session",
            session_id = %session_id,
            kind = ?reply.kind,
            topic = reply.topic.map(|t| t.as_str()).unwrap_or("none"),
            level = session.context.experience_level.as_str(),
            "Reply composed"
        );

        ChatReply {
            response: reply.text,
            session_id,
            kind: reply.kind,
            topic: reply.topic,
        }
    }

    /// Clears context and transcript of `session_id`. Unknown ids are a no-op.
    /// Returns whether a session existed.
    pub fn reset(&self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.context.reset();
                session.transcript.clear();
                session.last_active = Instant::now();
                tracing::debug!(target: "repro::session", session_id, "Session reset");
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.sessions.get(session_id).map(|session| SessionSnapshot {
            session_id: session_id.to_string(),
            context: session.context.clone(),
            transcript: session.transcript.clone(),
            idle_secs: session.last_active.elapsed().as_secs(),
        })
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Drops sessions idle for longer than `ttl`; returns how many were dropped.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_active.elapsed() <= ttl);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(target: "repro::session", evicted, "Evicted idle sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
