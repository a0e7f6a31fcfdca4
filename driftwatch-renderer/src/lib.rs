//! # driftwatch-renderer
//!
//! Tera templates for the local documents `driftwatch verify --fix` writes:
//! data-room alias documents and the root README pointer block.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use driftwatch_renderer::{PointerContext, Renderer};
//!
//! fn pointer() -> Option<String> {
//!     let renderer = Renderer::new().ok()?;
//!     renderer.render_pointer(&PointerContext::new("docs/Data_Room/README.md")).ok()
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{relative_link, AliasContext, PointerContext};
pub use engine::{DocKind, Renderer, OVERRIDE_DIR};
pub use error::RenderError;
