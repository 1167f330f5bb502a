// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Leaf classification endpoint module
//!
//! Provides POST /classify for multipart image uploads.

pub mod handler;
pub mod response;

pub use handler::classify_handler;
pub use response::ClassifyResponse;
