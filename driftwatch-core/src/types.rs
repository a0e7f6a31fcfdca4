//! Domain types for driftwatch.
//!
//! The remote workspace API returns loosely typed JSON block records keyed by a
//! `type` discriminator. Everything in this module is the closed, typed view of
//! those records that the rest of the workspace works with, plus the value
//! types an audit run produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BlockDecodeError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of a remote block or page, exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub String);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Logical name of a hub link in the expected mapping (e.g. `canon`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HubName(pub String);

impl fmt::Display for HubName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for HubName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HubName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Canonical page identifier: 32 lowercase hex digits grouped 8-4-4-4-12.
///
/// Only constructed through [`PageId::canonicalize`], so two values compare
/// equal iff they reference the same page regardless of source formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(String);

impl PageId {
    /// Canonicalize any page reference: a dashed or undashed id, a page URL,
    /// or a relative href.
    ///
    /// Every non-hex character is discarded and the rest lowercased. Exactly
    /// 32 remaining digits produce a `PageId`; anything else yields `None`.
    pub fn canonicalize(raw: &str) -> Option<PageId> {
        let hex: String = raw
            .chars()
            .filter(char::is_ascii_hexdigit)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if hex.len() != 32 {
            return None;
        }
        Some(PageId(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32],
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Undashed form, as it appears in page URLs.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for PageId {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        PageId::canonicalize(&raw).ok_or_else(|| format!("'{raw}' is not a 32-hex-digit page id"))
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// Block model
// ---------------------------------------------------------------------------

/// One run of rich text inside a text-bearing block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    /// Hyperlink reference carried by the run, if any.
    #[serde(default)]
    pub href: Option<String>,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { plain_text: text.into(), href: None }
    }

    pub fn linked(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self { plain_text: text.into(), href: Some(href.into()) }
    }
}

/// The rich-text-bearing block variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
}

impl TextStyle {
    /// All text styles in a stable order.
    pub fn all() -> &'static [TextStyle] {
        &[
            TextStyle::Heading1,
            TextStyle::Heading2,
            TextStyle::Heading3,
            TextStyle::Paragraph,
            TextStyle::BulletedListItem,
            TextStyle::NumberedListItem,
            TextStyle::ToDo,
            TextStyle::Toggle,
            TextStyle::Quote,
            TextStyle::Callout,
        ]
    }

    /// The API `type` discriminator for this style.
    pub fn type_name(self) -> &'static str {
        match self {
            TextStyle::Heading1         => "heading_1",
            TextStyle::Heading2         => "heading_2",
            TextStyle::Heading3         => "heading_3",
            TextStyle::Paragraph        => "paragraph",
            TextStyle::BulletedListItem => "bulleted_list_item",
            TextStyle::NumberedListItem => "numbered_list_item",
            TextStyle::ToDo             => "to_do",
            TextStyle::Toggle           => "toggle",
            TextStyle::Quote            => "quote",
            TextStyle::Callout          => "callout",
        }
    }

    pub fn from_type_name(name: &str) -> Option<TextStyle> {
        TextStyle::all().iter().copied().find(|s| s.type_name() == name)
    }
}

/// Closed view over the remote block variants this system understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading, paragraph, list item, to-do, toggle, quote or callout.
    Text { style: TextStyle, rich_text: Vec<RichText> },
    /// A nested page; only its title is visible from the parent.
    ChildPage { title: String },
    /// An explicit navigation link. `page_id` is the raw, uncanonicalized
    /// reference, absent for links to databases.
    LinkToPage { page_id: Option<String> },
    /// Any block type not listed above. `plain_text` keeps every `plain_text`
    /// value found anywhere in its payload.
    Unsupported { kind: String, plain_text: Vec<String> },
}

impl BlockKind {
    /// The API `type` discriminator.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Text { style, .. } => style.type_name(),
            BlockKind::ChildPage { .. } => "child_page",
            BlockKind::LinkToPage { .. } => "link_to_page",
            BlockKind::Unsupported { kind, .. } => kind,
        }
    }

    /// Rich-text runs, for text-bearing variants only.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            BlockKind::Text { rich_text, .. } => Some(rich_text),
            _ => None,
        }
    }
}

/// One node of the remote block tree. Read-only snapshot; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self { id: id.into(), has_children: false, kind }
    }

    /// Mark the block as having children (so a crawl descends into it).
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// A text-bearing block made of the given runs.
    pub fn text(id: impl Into<BlockId>, style: TextStyle, rich_text: Vec<RichText>) -> Self {
        Self::new(id, BlockKind::Text { style, rich_text })
    }

    pub fn paragraph(id: impl Into<BlockId>, text: &str) -> Self {
        Self::text(id, TextStyle::Paragraph, vec![RichText::plain(text)])
    }

    pub fn heading(id: impl Into<BlockId>, text: &str) -> Self {
        Self::text(id, TextStyle::Heading1, vec![RichText::plain(text)])
    }

    pub fn callout(id: impl Into<BlockId>, text: &str) -> Self {
        Self::text(id, TextStyle::Callout, vec![RichText::plain(text)])
    }

    pub fn child_page(id: impl Into<BlockId>, title: &str) -> Self {
        Self::new(id, BlockKind::ChildPage { title: title.to_string() })
    }

    pub fn link_to_page(id: impl Into<BlockId>, page_id: &str) -> Self {
        Self::new(id, BlockKind::LinkToPage { page_id: Some(page_id.to_string()) })
    }
}

/// Wire shape of a block record before it is narrowed into [`BlockKind`].
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

#[derive(Default, Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Default, Deserialize)]
struct ChildPagePayload {
    #[serde(default)]
    title: String,
}

#[derive(Default, Deserialize)]
struct LinkToPagePayload {
    #[serde(default)]
    page_id: Option<String>,
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockDecodeError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let payload = raw.payload.get(&raw.kind).filter(|v| !v.is_null());
        let kind = decode_kind(&raw.kind, payload).map_err(|e| BlockDecodeError {
            id: raw.id.clone(),
            kind: raw.kind.clone(),
            message: e.to_string(),
        })?;
        Ok(Block { id: BlockId(raw.id), has_children: raw.has_children, kind })
    }
}

// A missing payload object reads as an empty one; a present but mistyped one
// is an error.
fn decode_kind(kind: &str, payload: Option<&Value>) -> Result<BlockKind, serde_json::Error> {
    if let Some(style) = TextStyle::from_type_name(kind) {
        let body = match payload {
            Some(v) => TextPayload::deserialize(v)?,
            None => TextPayload::default(),
        };
        return Ok(BlockKind::Text { style, rich_text: body.rich_text });
    }

    match kind {
        "child_page" => {
            let body = match payload {
                Some(v) => ChildPagePayload::deserialize(v)?,
                None => ChildPagePayload::default(),
            };
            Ok(BlockKind::ChildPage { title: body.title })
        }
        "link_to_page" => {
            let body = match payload {
                Some(v) => LinkToPagePayload::deserialize(v)?,
                None => LinkToPagePayload::default(),
            };
            Ok(BlockKind::LinkToPage { page_id: body.page_id })
        }
        other => {
            let mut plain_text = Vec::new();
            if let Some(v) = payload {
                collect_plain_text(v, &mut plain_text);
            }
            Ok(BlockKind::Unsupported { kind: other.to_string(), plain_text })
        }
    }
}

fn collect_plain_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("plain_text") {
                out.push(text.clone());
            }
            for v in map.values() {
                collect_plain_text(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_plain_text(v, out);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Expectations and report
// ---------------------------------------------------------------------------

/// One resolved entry of the expected hub mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedHub {
    pub name: HubName,
    /// Environment key the identifier was read from.
    pub env_key: String,
    /// `None` when the configured value does not canonicalize.
    pub page_id: Option<PageId>,
}

/// The expected hub mapping, in manifest order.
pub type ExpectedMapping = Vec<ExpectedHub>;

/// Verdict of a single reconciliation phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseOutcome {
    Passed,
    Failed,
    /// Not run because optional configuration is absent; counts as a pass.
    Skipped { reason: String },
    /// Could not complete (network, auth, payload, marker); counts as a failure.
    Errored { cause: String },
}

impl PhaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, PhaseOutcome::Passed | PhaseOutcome::Skipped { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhaseOutcome::Passed => "PASS",
            PhaseOutcome::Failed => "FAIL",
            PhaseOutcome::Skipped { .. } => "SKIP",
            PhaseOutcome::Errored { .. } => "ERROR",
        }
    }
}

/// A hub whose expected target was not linked from the active navigation section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingHubLink {
    pub name: HubName,
    pub env_key: String,
    /// `None` when the configured identifier itself was malformed.
    pub expected: Option<PageId>,
}

/// Output of one reconciliation run. Built fresh each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub local: PhaseOutcome,
    pub remote_titles: PhaseOutcome,
    pub hub_links: PhaseOutcome,
    pub missing_paths: Vec<String>,
    pub missing_titles: Vec<String>,
    pub missing_hubs: Vec<MissingHubLink>,
}

impl DriftReport {
    /// Overall verdict: the AND of all three phases.
    pub fn passed(&self) -> bool {
        self.local.is_pass() && self.remote_titles.is_pass() && self.hub_links.is_pass()
    }

    pub fn discrepancy_count(&self) -> usize {
        self.missing_paths.len() + self.missing_titles.len() + self.missing_hubs.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newtype_display() {
        assert_eq!(BlockId::from("b-1").to_string(), "b-1");
        assert_eq!(HubName::from("canon").to_string(), "canon");
    }

    #[test]
    fn canonicalize_dashes_and_lowercases() {
        let id = PageId::canonicalize("0123456789ABCDEF0123456789abcdef").expect("valid");
        assert_eq!(id.as_str(), "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(id.compact(), "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn canonicalize_rejects_short_and_long_input() {
        assert!(PageId::canonicalize("1234").is_none());
        assert!(PageId::canonicalize(&"a".repeat(33)).is_none());
        assert!(PageId::canonicalize("").is_none());
    }

    #[test]
    fn page_id_deserialize_canonicalizes() {
        let id: PageId = serde_json::from_value(json!("AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"))
            .expect("deserialize");
        assert_eq!(id.as_str(), "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa");
        assert!(serde_json::from_value::<PageId>(json!("nope")).is_err());
    }

    #[test]
    fn decodes_text_block_with_href_runs() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "callout",
            "has_children": true,
            "callout": {
                "rich_text": [
                    {"plain_text": "New ", "href": null},
                    {"plain_text": "Navigation", "href": "/0123456789abcdef0123456789abcdef"}
                ],
                "icon": {"emoji": "🧭"}
            }
        }))
        .expect("decode");

        assert!(block.has_children);
        assert_eq!(block.kind.type_name(), "callout");
        let runs = block.kind.rich_text().expect("rich text");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].href.as_deref(), Some("/0123456789abcdef0123456789abcdef"));
    }

    #[test]
    fn decodes_child_page_and_link_to_page() {
        let page: Block = serde_json::from_value(json!({
            "id": "p1", "type": "child_page", "has_children": true,
            "child_page": {"title": "QT - Canon"}
        }))
        .expect("child page");
        assert_eq!(page.kind, BlockKind::ChildPage { title: "QT - Canon".into() });

        let link: Block = serde_json::from_value(json!({
            "id": "l1", "type": "link_to_page",
            "link_to_page": {"type": "page_id", "page_id": "abc"}
        }))
        .expect("link");
        assert_eq!(link.kind, BlockKind::LinkToPage { page_id: Some("abc".into()) });
        assert!(!link.has_children);
    }

    #[test]
    fn unknown_type_becomes_unsupported_with_nested_plain_text() {
        let block: Block = serde_json::from_value(json!({
            "id": "t1", "type": "table_row",
            "table_row": {"cells": [[{"plain_text": "New Navigation Block"}], [{"plain_text": "x"}]]}
        }))
        .expect("decode");
        match block.kind {
            BlockKind::Unsupported { kind, plain_text } => {
                assert_eq!(kind, "table_row");
                assert_eq!(plain_text, vec!["New Navigation Block", "x"]);
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_reads_as_empty() {
        let block: Block =
            serde_json::from_value(json!({"id": "b", "type": "paragraph"})).expect("decode");
        assert_eq!(block.kind.rich_text().map(<[RichText]>::len), Some(0));
    }

    #[test]
    fn mistyped_payload_is_an_error() {
        let err = serde_json::from_value::<Block>(json!({
            "id": "b", "type": "paragraph", "paragraph": {"rich_text": "not a list"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("malformed `paragraph` block b"), "got: {err}");
    }

    #[test]
    fn skipped_counts_as_pass_and_errored_as_failure() {
        assert!(PhaseOutcome::Passed.is_pass());
        assert!(PhaseOutcome::Skipped { reason: "unset".into() }.is_pass());
        assert!(!PhaseOutcome::Failed.is_pass());
        assert!(!PhaseOutcome::Errored { cause: "timeout".into() }.is_pass());
    }

    #[test]
    fn report_verdict_is_and_of_phases() {
        let mut report = DriftReport {
            local: PhaseOutcome::Passed,
            remote_titles: PhaseOutcome::Skipped { reason: "unset".into() },
            hub_links: PhaseOutcome::Passed,
            missing_paths: vec![],
            missing_titles: vec![],
            missing_hubs: vec![],
        };
        assert!(report.passed());
        report.hub_links = PhaseOutcome::Errored { cause: "marker".into() };
        assert!(!report.passed());
    }
}
