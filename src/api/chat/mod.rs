// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat endpoint module
//!
//! Provides POST /chat and POST /chat/reset, scoped by a session cookie.

pub mod handler;
pub mod request;
pub mod response;
pub mod session;

pub use handler::{chat_handler, reset_handler};
pub use request::ChatRequest;
pub use response::{ChatResponse, ResetResponse};
