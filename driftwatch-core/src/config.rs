//! Environment resolution of credentials and page identifiers.
//!
//! The manifest only names environment keys. Resolution goes through a caller
//! supplied lookup (`Fn(&str) -> Option<String>`) so tests never touch the
//! process environment. Values are trimmed and blank counts as unset.

use std::fmt;
use std::time::Duration;

use crate::error::MissingConfig;
use crate::manifest::{HubEntry, RemoteSection};
use crate::types::{ExpectedHub, ExpectedMapping, HubName, PageId};

/// Fully resolved remote settings for one audit run.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub api_base: String,
    pub api_version: String,
    pub api_key: String,
    pub root: PageId,
    pub max_depth: usize,
    pub page_size: u32,
    pub timeout: Duration,
    pub marker: String,
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("api_key", &"<redacted>")
            .field("root", &self.root)
            .field("max_depth", &self.max_depth)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("marker", &self.marker)
            .finish()
    }
}

/// Lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn read<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Resolve the credential and root page for the remote phases.
///
/// A root value that does not canonicalize is reported alongside unset keys.
pub fn resolve_remote<F>(section: &RemoteSection, lookup: F) -> Result<RemoteSettings, MissingConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut keys = Vec::new();

    let api_key = read(&lookup, &section.api_key_env);
    if api_key.is_none() {
        keys.push(section.api_key_env.clone());
    }

    let root = match read(&lookup, &section.root_page_env) {
        None => {
            keys.push(section.root_page_env.clone());
            None
        }
        Some(raw) => {
            let id = PageId::canonicalize(&raw);
            if id.is_none() {
                keys.push(format!("{} (not a page id)", section.root_page_env));
            }
            id
        }
    };

    match (api_key, root) {
        (Some(api_key), Some(root)) => Ok(RemoteSettings {
            api_base: section.api_base.trim_end_matches('/').to_string(),
            api_version: section.api_version.clone(),
            api_key,
            root,
            max_depth: section.max_depth,
            page_size: section.page_size,
            timeout: Duration::from_secs(section.timeout_secs),
            marker: section.marker.clone(),
        }),
        _ => Err(MissingConfig { keys }),
    }
}

/// Resolve the expected hub mapping.
///
/// Unset keys make the whole mapping unavailable; set but malformed values
/// resolve to an [`ExpectedHub`] without a page id.
pub fn resolve_hubs<F>(hubs: &[HubEntry], lookup: F) -> Result<ExpectedMapping, MissingConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut keys = Vec::new();
    let mut resolved = Vec::with_capacity(hubs.len());
    for hub in hubs {
        match read(&lookup, &hub.env) {
            None => keys.push(hub.env.clone()),
            Some(raw) => resolved.push(ExpectedHub {
                name: HubName::from(hub.name.as_str()),
                env_key: hub.env.clone(),
                page_id: PageId::canonicalize(&raw),
            }),
        }
    }
    if keys.is_empty() {
        Ok(resolved)
    } else {
        Err(MissingConfig { keys })
    }
}
