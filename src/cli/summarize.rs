// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{bail, Result};
use clap::Args;
use std::io::Write;

use crate::config::AppConfig;
use crate::summary::SummaryEvent;

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Id printed by `looq search`
    pub request_id: String,

    /// Generation model (defaults to DEFAULT_MODEL)
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(args: SummarizeArgs, config: AppConfig) -> Result<()> {
    let state = super::build_state(&config)?;
    let mut events = state.summarizer.spawn(args.request_id, args.model);

    let mut stdout = std::io::stdout();
    let mut printed = 0;
    while let Some(event) = events.recv().await {
        match event {
            SummaryEvent::Content { content } => {
                // Content is cumulative; print only the new tail.
                if let Some(tail) = content.get(printed..) {
                    write!(stdout, "{}", tail)?;
                    stdout.flush()?;
                }
                printed = content.len();
            }
            SummaryEvent::Done { sources } => {
                writeln!(stdout)?;
                for (i, url) in sources.iter().enumerate() {
                    writeln!(stdout, "[{}] {}", i + 1, url)?;
                }
                return Ok(());
            }
            SummaryEvent::Error { error } => bail!("Summary failed: {}", error),
        }
    }
    bail!("Summary ended without a result")
}
