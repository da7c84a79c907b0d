//! Flattening: deterministic conversion of an element sequence into a
//! single HTML-tagged text string.
//!
//! This is the one pure, reusable transform in the crate. The exact tag
//! strings, spacing, and single-space separator are load-bearing: the
//! output feeds a downstream tool-calling agent that was built against
//! this precise shape, so the formatting must not drift.
//!
//! Per-element rules (text trimmed once, before dispatch):
//!
//! | type | segment |
//! |------|---------|
//! | Title | `<h1> {text}</h1><br>` |
//! | Header | `<h2> {text}</h2><br/>` |
//! | NarrativeText / UncategorizedText | `<p>{text}</p>` |
//! | ListItem | `<li>{text}</li>` |
//! | PageNumber | `Page number: {text}` |
//! | Table | HTML from metadata, or empty segment if absent |
//! | anything else | trimmed text unchanged |
//!
//! The transform is total: unknown types fall through to the raw-text
//! branch, a Table without an HTML rendering yields an empty segment, and
//! the empty sequence yields the empty string. Input order is preserved
//! exactly — no sorting, grouping, or deduplication.

use crate::element::{Element, ElementType};

/// Flatten an ordered element sequence into one marked-up text string.
pub fn flatten(elements: &[Element]) -> String {
    let segments: Vec<String> = elements.iter().map(flatten_element).collect();
    segments.join(" ")
}

fn flatten_element(element: &Element) -> String {
    let text = element.text.trim();

    match element.element_type {
        ElementType::Title => format!("<h1> {text}</h1><br>"),
        ElementType::Header => format!("<h2> {text}</h2><br/>"),
        ElementType::NarrativeText | ElementType::UncategorizedText => format!("<p>{text}</p>"),
        ElementType::ListItem => format!("<li>{text}</li>"),
        ElementType::PageNumber => format!("Page number: {text}"),
        // Tables keep their HTML rendering verbatim; the plain text field
        // is a lossy linearisation and is intentionally ignored.
        ElementType::Table => element.table_html().unwrap_or_default().to_string(),
        ElementType::Other => text.to_string(),
    }
}
