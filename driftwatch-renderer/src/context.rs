//! Template contexts for the documents `--fix` writes.

use std::path::{Component, Path};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::RenderError;

/// Timestamp format stamped into generated documents.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Payload for an alias document: an investor-safe pointer to a canonical file.
#[derive(Debug, Clone, Serialize)]
pub struct AliasContext {
    pub title: String,
    /// Canonical path, relative to the repository root, `/`-separated.
    pub canonical: String,
    /// File name of the canonical document, used as the link text.
    pub canonical_name: String,
    /// Link from the alias document's directory to the canonical file.
    pub link: String,
    pub last_updated: String,
}

impl AliasContext {
    /// `alias` and `canonical` are both relative to the repository root.
    pub fn new(alias: &Path, canonical: &Path, title: &str, now: NaiveDateTime) -> Self {
        let from_dir = alias.parent().unwrap_or(Path::new(""));
        AliasContext {
            title: title.to_string(),
            canonical: slash_path(canonical),
            canonical_name: canonical
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            link: relative_link(from_dir, canonical),
            last_updated: now.format(STAMP_FORMAT).to_string(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// Payload for the `## Data Room` block appended to the root README.
#[derive(Debug, Clone, Serialize)]
pub struct PointerContext {
    pub target: String,
}

impl PointerContext {
    pub fn new(target: &str) -> Self {
        PointerContext { target: target.to_string() }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

fn slash_path(path: &Path) -> String {
    normal_parts(path).join("/")
}

fn normal_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Relative link from directory `from_dir` to file `to`, both repo-relative.
pub fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from = normal_parts(from_dir);
    let to = normal_parts(to);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(to[common..].iter().map(String::as_str));
    parts.join("/")
}
