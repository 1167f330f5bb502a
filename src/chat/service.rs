// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat pipeline: validate, assemble context, generate, persist

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use super::context::{build_instruction, estimate_tokens};
use super::errors::ChatError;
use super::session_store::SessionStore;
use crate::generation::GenerationClient;

pub struct ChatService {
    client: Option<Arc<dyn GenerationClient>>,
    store: Arc<dyn SessionStore>,
    /// One lock per session, held across read, generate and write
    session_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ChatService {
    pub fn new(client: Option<Arc<dyn GenerationClient>>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn lease(&self, session_id: &str) -> SessionLease<'_> {
        let mut locks = self
            .session_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let lock = locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        SessionLease {
            locks: &self.session_locks,
            session_id: session_id.to_string(),
            lock,
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.session_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Run one exchange for a session and return the bot reply
    ///
    /// History is only written after a successful generation.
    pub async fn chat(&self, session_id: &str, prompt: &str) -> Result<String, ChatError> {
        let client = self.client.as_ref().ok_or(ChatError::ModelUnavailable)?;

        if prompt.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }

        let lease = self.lease(session_id);
        let _guard = lease.lock.lock().await;

        let mut history = self.store.get(session_id).await;
        let instruction = build_instruction(&history, prompt);
        let start = Instant::now();

        let response = match client.generate(&instruction).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Chat generation failed for session {}: {}", session_id, e);
                return Err(ChatError::GenerationFailed(e));
            }
        };

        history.push_exchange(prompt, response.as_str());
        let history_len = history.len();
        self.store.set(session_id, history).await;

        info!(
            "💬 Chat session {}: history={} entries, instruction≈{} tokens, {}ms",
            session_id,
            history_len,
            estimate_tokens(&instruction),
            start.elapsed().as_millis()
        );

        Ok(response)
    }

    /// Clear a session's history; always succeeds
    pub async fn reset(&self, session_id: &str) {
        let lease = self.lease(session_id);
        {
            let _guard = lease.lock.lock().await;
            self.store.clear(session_id).await;
        }
        drop(lease);
        info!("Chat session {} reset", session_id);
    }
}

/// A session's lock, removed from the map when the last holder lets go
/// (including a request cancelled mid-exchange)
struct SessionLease<'a> {
    locks: &'a Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    session_id: String,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map, one here: nobody else holds or waits
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.session_id);
        }
    }
}
