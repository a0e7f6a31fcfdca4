//! Visible text of a block.
//!
//! Text-bearing variants yield the concatenation of their runs' `plain_text`
//! (no separator, trimmed); child pages yield their title. Every other
//! variant, including unrecognized ones, yields nothing.

use driftwatch_core::{Block, BlockKind};

/// Extract the human-readable snippet a block carries, if any.
///
/// Returns at most one snippet; empty text is dropped.
pub fn extract(block: &Block) -> Vec<String> {
    let text = match &block.kind {
        BlockKind::Text { rich_text, .. } => rich_text
            .iter()
            .map(|run| run.plain_text.as_str())
            .collect::<String>()
            .trim()
            .to_string(),
        BlockKind::ChildPage { title } => title.clone(),
        BlockKind::LinkToPage { .. } | BlockKind::Unsupported { .. } => String::new(),
    };

    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// Snippets of every block, in traversal order.
pub fn snippets(blocks: &[Block]) -> Vec<String> {
    blocks.iter().flat_map(extract).collect()
}
