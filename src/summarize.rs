//! Content summarization
//!
//! Length caps applied to extracted page content before it is embedded in a
//! recommendation prompt, keeping the prompt under the completion token
//! budget. Capping is selective: paragraphs, list items, and link text are
//! bounded, while the title, meta description, and headings pass through
//! unbounded.

use crate::browser::{PageContent, PageList};

/// Maximum characters kept from a paragraph
pub const PARAGRAPH_CAP: usize = 200;

/// Maximum characters kept from a list item
pub const LIST_ITEM_CAP: usize = 100;

/// Maximum characters kept from link text
pub const LINK_TEXT_CAP: usize = 50;

const ELLIPSIS: &str = "...";

/// Cap a string to `max_chars` characters
///
/// Strings at or under the cap are returned unchanged. Longer strings keep
/// their first `max_chars - 3` characters followed by the ellipsis marker,
/// so the result is exactly `max_chars` characters long.
pub fn summarize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept = max_chars.saturating_sub(ELLIPSIS.len());
    let mut capped: String = text.chars().take(kept).collect();
    capped.push_str(ELLIPSIS);
    capped
}

/// Apply the selective length caps to extracted page content
pub fn summarize_content(content: PageContent) -> PageContent {
    PageContent {
        paragraphs: content
            .paragraphs
            .into_iter()
            .map(|p| summarize(&p, PARAGRAPH_CAP))
            .collect(),
        lists: content
            .lists
            .into_iter()
            .map(|list| PageList {
                kind: list.kind,
                items: list
                    .items
                    .into_iter()
                    .map(|item| summarize(&item, LIST_ITEM_CAP))
                    .collect(),
            })
            .collect(),
        links: content
            .links
            .into_iter()
            .map(|mut link| {
                link.text = summarize(&link.text, LINK_TEXT_CAP);
                link
            })
            .collect(),
        ..content
    }
}
