// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Grape-care chat assistant with bounded per-session history

pub mod context;
pub mod errors;
pub mod history;
pub mod service;
pub mod session_store;

pub use context::{build_instruction, PERSONA_INSTRUCTION};
pub use errors::ChatError;
pub use history::{ChatRole, ChatTurn, ConversationHistory, MAX_HISTORY_TURNS};
pub use service::ChatService;
pub use session_store::{InMemorySessionStore, SessionStore};
