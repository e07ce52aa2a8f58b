//! Metadata comments recognized by the legacy page tech.
//!
//! Joined markdown may carry `<!-- TITLE: ... -->` and
//! `<!-- HEAD: ... -->` comment lines. `HEAD:` payloads are JSON nodes;
//! anything else is rejected with a parse error rather than evaluated.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--\s*(.*?)\s*-->$").expect("invalid comment regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TITLE:\s*(.*)$").expect("invalid title regex"));
static HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HEAD:\s*(.*)$").expect("invalid head regex"));

/// One metadata entry found in a comment line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MetaEntry {
    /// Page title.
    Title(String),
    /// One head entry, given as a JSON node.
    Head(Value),
}

/// Parse one line as a metadata comment.
///
/// Returns `None` for lines that are not metadata comments, and an
/// error when a `HEAD:` payload is not valid JSON.
pub(crate) fn parse_meta_comment(line: &str) -> Option<Result<MetaEntry, serde_json::Error>> {
    let caps = COMMENT.captures(line.trim())?;
    let body = caps.get(1).map_or("", |m| m.as_str());
    if let Some(caps) = TITLE.captures(body) {
        return Some(Ok(MetaEntry::Title(caps[1].to_owned())));
    }
    if let Some(caps) = HEAD.captures(body) {
        return Some(serde_json::from_str(&caps[1]).map(MetaEntry::Head));
    }
    None
}
