//! Tera rendering engine: [`DocKind`] enum and [`Renderer`].
//!
//! | Document        | Written to                          |
//! |-----------------|-------------------------------------|
//! | Alias           | `<alias_dir>/<file>` (new file)     |
//! | ReadmePointer   | appended to the root `README.md`    |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::{AliasContext, PointerContext};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("alias.md.tera", include_str!("templates/alias.md.tera")),
    ("readme_pointer.md.tera", include_str!("templates/readme_pointer.md.tera")),
];

/// Repo-relative directory searched for `.tera` overrides.
pub const OVERRIDE_DIR: &str = ".driftwatch/templates";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn load_overrides(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let path = entry.map_err(|e| io_err(dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, content));
    }
    Ok(templates)
}

fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = TPLS
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    if let Some(dir) = override_dir {
        templates.extend(load_overrides(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// DocKind
// ---------------------------------------------------------------------------

/// Documents the fixer knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    Alias,
    ReadmePointer,
}

impl DocKind {
    pub fn all() -> &'static [DocKind] {
        &[DocKind::Alias, DocKind::ReadmePointer]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            DocKind::Alias         => "alias.md.tera",
            DocKind::ReadmePointer => "readme_pointer.md.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders fix documents from embedded templates, optionally overridden by
/// same-named `.tera` files in a directory.
///
/// Create once and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_overrides(None)
    }

    pub fn with_overrides(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera(override_dir)? })
    }

    /// Embedded templates plus any overrides under `<repo>/.driftwatch/templates`.
    pub fn for_repo(repo: &Path) -> Result<Self, RenderError> {
        Self::with_overrides(Some(&repo.join(OVERRIDE_DIR)))
    }

    pub fn render_alias(&self, ctx: &AliasContext) -> Result<String, RenderError> {
        let content = self.tera.render(DocKind::Alias.template_name(), &ctx.to_tera_context()?)?;
        Ok(content)
    }

    pub fn render_pointer(&self, ctx: &PointerContext) -> Result<String, RenderError> {
        let content =
            self.tera.render(DocKind::ReadmePointer.template_name(), &ctx.to_tera_context()?)?;
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
