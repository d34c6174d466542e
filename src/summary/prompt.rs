// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summary prompt assembly
//!
//! Pure string building: the same inputs always give the same prompt.

use crate::search::content::{truncate_with_marker, FetchedContent};

/// Overall character budget for result snippets
pub const SNIPPET_BUDGET_CHARS: usize = 1000;

const PREAMBLE: &str = "You are tasked to make a summary based on a user query to a search engine. \
Only return the content in markdown format without a title or any other information. \
Make it concise and digestible. Refrain from advertising the result or making any calls to action. \
Be objective. Bold key points. Cite sources as markdown links where relevant.\n";

const CLOSING: &str = "\nIf the content contains captcha blocks or any errors, ignore the content \
and use your own knowledge to generate the summary.\n";

/// Build the summary prompt
///
/// Sections appear in a fixed order: query, infobox titles, snippets (capped
/// at [`SNIPPET_BUDGET_CHARS`]), then each fetched page with its URL. Empty
/// sections are left out.
pub fn build_prompt(
    query: &str,
    info_box_titles: &[String],
    snippets: &[String],
    contents: &[FetchedContent],
) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push_str(&format!("The user query is: {}\n", query));

    if !info_box_titles.is_empty() {
        prompt.push_str(&format!(
            "Related topics: {}\n",
            info_box_titles.join(", ")
        ));
    }

    if !snippets.is_empty() {
        let joined = snippets.join("\n");
        prompt.push_str("Search result snippets:\n");
        prompt.push_str(&truncate_with_marker(&joined, SNIPPET_BUDGET_CHARS));
        prompt.push('\n');
    }

    if !contents.is_empty() {
        prompt.push_str("The following are the contents of the top search results:\n");
        for content in contents {
            prompt.push_str(&format!("Source: {}\n{}\n\n", content.url, content.content));
        }
    }

    prompt.push_str(CLOSING);
    prompt
}
