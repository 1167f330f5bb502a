// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted text generation for the chat assistant

pub mod client;
pub mod gemini;
pub mod retry;

pub use client::{GenerationClient, GenerationError};
pub use gemini::GeminiClient;
pub use retry::{RetryPolicy, RetryingClient};
