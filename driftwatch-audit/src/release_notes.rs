//! Release-notes format and ordering check.
//!
//! Rules, checked in this order; the first violation wins:
//!
//! - the file ends with a newline
//! - at least one `## vX.Y.Z — YYYY-MM-DD` header exists, dated with a real calendar day
//! - versions are unique and strictly increasing, dates non-decreasing
//! - each header is followed by a blank line
//! - `### ` headings and `- ` bullets are not indented
//! - no carriage returns

use std::collections::HashSet;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::error::{io_err, AuditError};

pub const DEFAULT_RELEASE_FILE: &str = "RELEASE.md";

const HEADER_PATTERN: &str = r"^##\s+v(\d+)\.(\d+)\.(\d+)\s+—\s+(\d{4}-\d{2}-\d{2})\s*$";

/// First rule broken, with its 1-based line when one applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseViolation {
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for ReleaseViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub releases: usize,
    /// Last (highest) version, e.g. `v1.3.5`.
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReleaseCheck {
    Passed(ReleaseSummary),
    Failed(ReleaseViolation),
}

struct Header {
    version: (u64, u64, u64),
    date: NaiveDate,
    index: usize,
}

fn violation(line: Option<usize>, message: impl Into<String>) -> ReleaseCheck {
    ReleaseCheck::Failed(ReleaseViolation { line, message: message.into() })
}

/// Check release notes at `path`. A missing file is a violation.
pub fn check_release_file(path: &Path) -> Result<ReleaseCheck, AuditError> {
    match std::fs::read(path) {
        Ok(bytes) => check_release_notes(&String::from_utf8_lossy(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Ok(violation(None, format!("{} not found", path.display())))
        }
        Err(e) => Err(io_err(path, e)),
    }
}

pub fn check_release_notes(text: &str) -> Result<ReleaseCheck, AuditError> {
    if !text.ends_with('\n') {
        return Ok(violation(None, "file must end with a newline"));
    }

    let header_re = Regex::new(HEADER_PATTERN)?;
    let lines: Vec<&str> = text.lines().collect();

    let mut headers = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let Some(caps) = header_re.captures(line) else {
            continue;
        };
        let number = |i: usize| caps[i].parse::<u64>().ok();
        let (Some(major), Some(minor), Some(patch)) = (number(1), number(2), number(3)) else {
            return Ok(violation(Some(index + 1), "version component out of range"));
        };
        let Ok(date) = NaiveDate::parse_from_str(&caps[4], "%Y-%m-%d") else {
            return Ok(violation(Some(index + 1), format!("invalid date {}", &caps[4])));
        };
        headers.push(Header { version: (major, minor, patch), date, index });
    }

    if headers.is_empty() {
        return Ok(violation(
            None,
            "no release headers found. Expected lines like: ## v1.3.5 — 2025-12-23",
        ));
    }

    let mut seen = HashSet::new();
    for (n, header) in headers.iter().enumerate() {
        let line = Some(header.index + 1);
        if !seen.insert(header.version) {
            let (a, b, c) = header.version;
            return Ok(violation(line, format!("duplicate version v{a}.{b}.{c}")));
        }
        let Some(prev) = n.checked_sub(1).map(|p| &headers[p]) else {
            continue;
        };
        if header.version <= prev.version {
            return Ok(violation(line, "versions must be strictly increasing"));
        }
        if header.date < prev.date {
            return Ok(violation(line, "dates must be non-decreasing"));
        }
    }

    for (n, header) in headers.iter().enumerate() {
        let end = headers.get(n + 1).map_or(lines.len(), |h| h.index);
        let block = &lines[header.index..end];

        if block.get(1).map_or(true, |l| !l.trim().is_empty()) {
            return Ok(violation(Some(header.index + 1), "missing blank line after header"));
        }

        for (offset, line) in block.iter().enumerate().skip(2) {
            let trimmed = line.trim_start();
            let line_no = Some(header.index + offset + 1);
            if trimmed.starts_with("### ") && !line.starts_with("### ") {
                return Ok(violation(line_no, "heading must not be indented"));
            }
            if trimmed.starts_with("- ") && !line.starts_with("- ") {
                return Ok(violation(line_no, "bullet must not be indented"));
            }
        }
    }

    if let Some(index) = text.split('\n').position(|l| l.contains('\r')) {
        return Ok(violation(Some(index + 1), "CRLF detected; please use LF endings"));
    }

    let (a, b, c) = headers[headers.len() - 1].version;
    Ok(ReleaseCheck::Passed(ReleaseSummary {
        releases: headers.len(),
        latest: format!("v{a}.{b}.{c}"),
    }))
}
