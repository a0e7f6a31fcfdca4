//! "Last marker wins" slicing of a traversal.
//!
//! A navigation section is opened by a block containing the marker phrase.
//! When the phrase occurs more than once, the latest occurrence is the active
//! section and earlier copies are stale.

use driftwatch_core::{Block, BlockKind};
use thiserror::Error;

use crate::{extract::extract, normalize::normalize};

/// No block in the traversal contains the marker phrase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("marker '{marker}' not found")]
pub struct MarkerNotFound {
    pub marker: String,
}

/// All text a block carries, for marker search. Unlike [`extract`], this
/// includes the `plain_text` retained from unrecognized block types.
fn searchable_text(block: &Block) -> String {
    match &block.kind {
        BlockKind::Unsupported { plain_text, .. } => plain_text.join(" "),
        _ => extract(block).concat(),
    }
}

/// The suffix of `blocks` starting at the last block whose normalized text
/// contains the normalized `marker`.
pub fn slice_from_last_marker<'a>(
    blocks: &'a [Block],
    marker: &str,
) -> Result<&'a [Block], MarkerNotFound> {
    let needle = normalize(marker);
    let not_found = || MarkerNotFound { marker: marker.to_string() };
    if needle.is_empty() {
        return Err(not_found());
    }

    let last = blocks
        .iter()
        .rposition(|block| normalize(&searchable_text(block)).contains(&needle))
        .ok_or_else(not_found)?;
    Ok(&blocks[last..])
}
