// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML to markdown conversion
//!
//! Used by the direct-fetch fallback when the reader proxy yields nothing.
//! Finds the main content area, drops boilerplate elements, and renders the
//! remaining tree as lightweight markdown (headings, lists, links, emphasis).

use scraper::{ElementRef, Html, Node, Selector};

/// Marker appended when text is cut to its character budget
pub const TRUNCATION_MARKER: &str = "...";

/// Elements whose whole subtree is dropped
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "nav", "footer", "header", "aside",
    "svg", "iframe", "form", "button",
];

/// Elements rendered as their own paragraph
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "blockquote", "table", "tr", "ul", "ol",
    "dl", "dd", "dt", "figure", "figcaption", "body",
];

/// Candidate containers for the main content, in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    "#content",
    "body",
];

/// Convert an HTML document to markdown and cut it to `max_chars`
pub fn extract_markdown(html: &str, max_chars: usize) -> String {
    truncate_with_marker(&html_to_markdown(html), max_chars)
}

/// Convert an HTML document to markdown without a length bound
pub fn html_to_markdown(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut fallback = None;
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let rendered = render(element);
            // Small containers are usually teasers, keep looking
            if rendered.chars().count() > 200 {
                return rendered;
            }
            if fallback.is_none() && !rendered.is_empty() {
                fallback = Some(rendered);
            }
        }
    }

    fallback.unwrap_or_else(|| render(document.root_element()))
}

/// Cut `text` to `max_chars` characters, appending `...` when anything was dropped
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

fn render(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_element(element, &mut out);
    normalise_whitespace(&out)
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    render_element(el, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }

    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = inline_text(element);
            if !text.is_empty() {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                out.push_str("\n\n");
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
        "br" => out.push('\n'),
        "li" => {
            out.push_str("\n- ");
            render_children(element, out);
        }
        "a" => {
            let text = inline_text(element);
            match element.value().attr("href") {
                Some(href) if href.starts_with("http") && !text.is_empty() => {
                    out.push_str(&format!("[{}]({})", text, href));
                }
                _ => out.push_str(&text),
            }
        }
        "strong" | "b" => push_wrapped(out, &inline_text(element), "**"),
        "em" | "i" => push_wrapped(out, &inline_text(element), "_"),
        "code" => push_wrapped(out, &inline_text(element), "`"),
        "pre" => {
            let text: String = element.text().collect();
            if !text.trim().is_empty() {
                out.push_str("\n\n");
                out.push_str(text.trim());
                out.push_str("\n\n");
            }
        }
        _ if BLOCK_TAGS.contains(&name) => {
            out.push_str("\n\n");
            render_children(element, out);
            out.push_str("\n\n");
        }
        _ => render_children(element, out),
    }
}

fn push_wrapped(out: &mut String, text: &str, marker: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(marker);
    out.push_str(text);
    out.push_str(marker);
}

/// Push text with every whitespace run reduced to one space
fn push_collapsed(out: &mut String, text: &str) {
    let mut prev_was_space = out.ends_with(' ') || out.ends_with('\n');
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}

fn inline_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim every line and allow at most one blank line between blocks
fn normalise_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !result.is_empty() {
            result.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        result.push_str(line);
        blank_run = 0;
    }

    result
}
