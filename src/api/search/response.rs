// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API response types

use serde::{Deserialize, Serialize};

use crate::search::{MetasearchResponse, SearchOutcome};

/// Response body for GET /api/search
///
/// The upstream result set, unchanged, plus the id that `/api/summary`
/// accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiResponse {
    #[serde(flatten)]
    pub response: MetasearchResponse,
    pub request_id: String,
}

impl From<SearchOutcome> for SearchApiResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            response: outcome.response,
            request_id: outcome.request_id,
        }
    }
}
