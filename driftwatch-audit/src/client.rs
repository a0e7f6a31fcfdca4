//! Remote block client.
//!
//! [`BlockSource`] is the seam between the crawler and the network: one call
//! is one request for one page of a block's children. [`NotionClient`] is the
//! blocking HTTP implementation; tests substitute in-memory sources.
//!
//! No retries and no caching happen at this layer.

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use driftwatch_core::{Block, RemoteSettings};

use crate::error::AuditError;

/// Upper bound on how much of an error response body is kept.
const ERROR_BODY_LIMIT: u64 = 2048;

/// One page of a block's children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChildrenPage {
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Anything that can list the children of a remote block.
pub trait BlockSource {
    fn fetch_children(
        &self,
        block_id: &str,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> Result<ChildrenPage, AuditError>;
}

// ---------------------------------------------------------------------------
// NotionClient
// ---------------------------------------------------------------------------

/// Blocking client for the workspace's `blocks/{id}/children` endpoint.
pub struct NotionClient {
    agent: ureq::Agent,
    api_base: String,
    api_version: String,
    api_key: String,
}

impl NotionClient {
    pub fn new(api_base: &str, api_version: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        NotionClient {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_settings(settings: &RemoteSettings) -> Self {
        Self::new(
            &settings.api_base,
            &settings.api_version,
            &settings.api_key,
            settings.timeout,
        )
    }

    fn children_url(&self, block_id: &str) -> String {
        format!("{}/blocks/{}/children", self.api_base, block_id)
    }
}

impl BlockSource for NotionClient {
    fn fetch_children(
        &self,
        block_id: &str,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> Result<ChildrenPage, AuditError> {
        let url = self.children_url(block_id);
        tracing::debug!(block_id, ?start_cursor, "fetching children");

        let mut request = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Notion-Version", &self.api_version)
            .query("page_size", &page_size.to_string());
        if let Some(cursor) = start_cursor {
            request = request.query("start_cursor", cursor);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(classify_status(status, response));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(AuditError::Network { message: transport.to_string() });
            }
        };

        let body = response
            .into_string()
            .map_err(|e| AuditError::Network { message: format!("reading response from {url}: {e}") })?;
        parse_children(&body)
    }
}

fn classify_status(status: u16, response: ureq::Response) -> AuditError {
    if status == 401 || status == 403 {
        return AuditError::Auth { status };
    }
    let mut body = String::new();
    if let Err(e) = response.into_reader().take(ERROR_BODY_LIMIT).read_to_string(&mut body) {
        tracing::debug!(status, error = %e, "error body truncated");
    }
    AuditError::Http { status, body: body.trim().to_string() }
}

/// Decode a `blocks/{id}/children` response body.
pub fn parse_children(body: &str) -> Result<ChildrenPage, AuditError> {
    serde_json::from_str(body).map_err(|e| AuditError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
