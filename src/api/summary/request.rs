// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Request body for POST /api/summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryApiRequest {
    /// Id returned by `/api/search`
    pub request_id: String,

    /// Generation model; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SummaryApiRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.request_id.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "requestId".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
