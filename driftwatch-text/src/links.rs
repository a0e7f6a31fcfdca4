//! Link targets referenced by blocks.
//!
//! Two sources count as a link: `link_to_page` blocks, and the `href` of any
//! rich-text run in a text-bearing block. Each raw reference is canonicalized;
//! references that do not reduce to a page id are ignored.

use std::collections::BTreeSet;

use driftwatch_core::{Block, BlockKind, PageId};

/// Canonicalize a raw page reference. See [`PageId::canonicalize`].
pub fn canonicalize(raw: &str) -> Option<PageId> {
    PageId::canonicalize(raw)
}

/// Every page id linked from `blocks`.
pub fn collect_link_targets(blocks: &[Block]) -> BTreeSet<PageId> {
    let mut linked = BTreeSet::new();
    for block in blocks {
        match &block.kind {
            BlockKind::LinkToPage { page_id: Some(raw) } => {
                linked.extend(canonicalize(raw));
            }
            BlockKind::Text { rich_text, .. } => {
                let hrefs = rich_text.iter().filter_map(|run| run.href.as_deref());
                linked.extend(hrefs.filter_map(canonicalize));
            }
            _ => {}
        }
    }
    linked
}
