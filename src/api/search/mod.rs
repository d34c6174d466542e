// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metasearch API endpoint
//!
//! Provides `/api/search`, which stores each result set and returns its id.

pub mod handler;
pub mod response;

pub use handler::search_handler;
pub use response::SearchApiResponse;
