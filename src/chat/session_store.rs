// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation history storage keyed by opaque session id

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::history::ConversationHistory;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// History for a session; empty when the session is unknown
    async fn get(&self, session_id: &str) -> ConversationHistory;

    async fn set(&self, session_id: &str, history: ConversationHistory);

    /// Forget a session; unknown ids are a no-op
    async fn clear(&self, session_id: &str);
}

/// Process-local store; histories live until reset or restart
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, ConversationHistory>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> ConversationHistory {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn set(&self, session_id: &str, history: ConversationHistory) {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), history);
    }

    async fn clear(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }
}
