//! Text algorithms over remote blocks.
//!
//! Everything here is pure: blocks in, strings / identifiers out. No I/O.
//!
//! - [`extract`] — visible text per block
//! - [`normalize`] — canonical form for fuzzy label matching
//! - [`links`] — link targets referenced by blocks
//! - [`marker`] — "last marker wins" slicing of a traversal

pub mod extract;
pub mod links;
pub mod marker;
pub mod normalize;

pub use extract::{extract, snippets};
pub use links::{canonicalize, collect_link_targets};
pub use marker::{slice_from_last_marker, MarkerNotFound};
pub use normalize::{matches, missing_labels, normalize};
