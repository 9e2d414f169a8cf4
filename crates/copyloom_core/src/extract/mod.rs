//! Plain-text extraction from block content.
//!
//! # Responsibility
//! - Turn one block's payload into normalized plain text for export.
//! - Keep the conversion pure and total; malformed input degrades to
//!   best-effort text instead of failing.
//!
//! # Invariants
//! - List items keep their original order; blank items are dropped.
//! - The final result carries no leading or trailing whitespace.

mod html;

use crate::model::BlockBody;

/// Marker prepended to every surviving list item.
const BULLET: &str = "\u{2022} ";

/// Extracts normalized plain text from a block payload.
///
/// List blocks join their non-blank items with newlines, bullet-prefixed.
/// Every other block type treats its content as an HTML fragment and
/// strips the markup. The result is trimmed and may be empty.
pub fn extract_block_text(body: &BlockBody) -> String {
    match body {
        BlockBody::List { items, .. } => list_items_to_text(items),
        BlockBody::Text { content }
        | BlockBody::Headline { content }
        | BlockBody::Subheadline { content } => inline_html_to_text(content),
        BlockBody::Button { content, .. } => inline_html_to_text(content),
    }
}

/// Joins list items into bullet lines.
///
/// Rules:
/// - Whitespace-only items are dropped.
/// - Surviving items are trimmed and prefixed with a bullet marker.
/// - Order is preserved; nothing is deduplicated.
pub fn list_items_to_text(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| format!("{BULLET}{item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strips inline markup from single-string content and trims the result.
pub fn inline_html_to_text(content: &str) -> String {
    html::html_fragment_to_text(content).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{extract_block_text, inline_html_to_text, list_items_to_text};
    use crate::model::BlockBody;

    #[test]
    fn list_items_keep_order_and_drop_blanks() {
        let items = vec!["  ".to_string(), "Buy now".to_string(), "Save 20%".to_string()];
        assert_eq!(list_items_to_text(&items), "\u{2022} Buy now\n\u{2022} Save 20%");
    }

    #[test]
    fn list_of_only_blanks_yields_empty() {
        let items = vec![String::new(), "   ".to_string(), "\t\n".to_string()];
        assert_eq!(list_items_to_text(&items), "");
    }

    #[test]
    fn list_items_are_trimmed_but_not_deduplicated() {
        let items = vec!["  a  ".to_string(), "a".to_string()];
        assert_eq!(list_items_to_text(&items), "\u{2022} a\n\u{2022} a");
    }

    #[test]
    fn paragraph_and_break_markers_become_newlines() {
        assert_eq!(inline_html_to_text("<p>Hello<br>World</p>"), "Hello\nWorld");
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(inline_html_to_text("  <p> padded </p>  "), "padded");
        assert_eq!(inline_html_to_text("<div></div>"), "");
    }

    #[test]
    fn dispatch_covers_every_block_shape() {
        let text = BlockBody::text("<strong>Now</strong> or never");
        assert_eq!(extract_block_text(&text), "Now or never");

        let headline = BlockBody::headline("<h1>Launch day</h1>");
        assert_eq!(extract_block_text(&headline), "Launch day");

        let list = BlockBody::list(vec!["one".to_string(), " ".to_string()]);
        assert_eq!(extract_block_text(&list), "\u{2022} one");

        let button = BlockBody::button("Sign&nbsp;up");
        assert_eq!(extract_block_text(&button), "Sign up");
    }
}
