// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;

use crate::api::SearchApiResponse;
use crate::config::AppConfig;
use crate::search::SearchParams;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query words
    #[arg(required = true)]
    pub query: Vec<String>,

    #[arg(long, default_value = "en-US")]
    pub language: String,

    /// day, month or year
    #[arg(long)]
    pub time_range: Option<String>,

    #[arg(long, default_value = "0")]
    pub safesearch: String,

    #[arg(long, default_value = "general")]
    pub categories: String,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        SearchParams {
            q: self.query.join(" "),
            language: self.language.clone(),
            time_range: self.time_range.clone(),
            safesearch: self.safesearch.clone(),
            categories: self.categories.clone(),
        }
    }
}

pub async fn run(args: SearchArgs, config: AppConfig) -> Result<()> {
    let state = super::build_state(&config)?;
    let outcome = state.search.search(&args.params()).await?;

    let body = SearchApiResponse::from(outcome);
    println!("{}", serde_json::to_string_pretty(&body)?);
    eprintln!("requestId: {}", body.request_id);
    Ok(())
}
