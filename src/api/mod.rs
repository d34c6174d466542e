// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod search;
pub mod streaming;
pub mod summary;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use http_server::{create_router, start_server, AppState};
pub use search::{search_handler, SearchApiResponse};
pub use summary::{summary_handler, SummaryApiRequest};
