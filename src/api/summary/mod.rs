// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming summary endpoint

pub mod handler;
pub mod request;

pub use handler::summary_handler;
pub use request::SummaryApiRequest;
