// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide configuration
//!
//! Each concern owns its settings and reads them from the environment; this
//! module only aggregates them.

use std::env;
use std::net::{IpAddr, SocketAddr};

use crate::inference::GenerationConfig;
use crate::search::{ContentFetchConfig, RerankConfig, SearchConfig};
use crate::storage::StoreConfig;

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("API_HOST").unwrap_or(defaults.host),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("Invalid API_HOST '{}': {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub content: ContentFetchConfig,
    pub generation: GenerationConfig,
    pub rerank: RerankConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            search: SearchConfig::from_env(),
            content: ContentFetchConfig::from_env(),
            generation: GenerationConfig::from_env(),
            rerank: RerankConfig::from_env(),
            store: StoreConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }

    /// First invalid setting, if any
    pub fn validate(&self) -> Result<(), String> {
        self.search.validate()?;
        self.content.validate()?;
        self.generation.validate()?;
        self.rerank.validate()?;
        self.server.socket_addr()?;
        Ok(())
    }
}
