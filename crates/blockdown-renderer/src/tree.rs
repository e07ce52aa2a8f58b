//! Document tree expansion.

use std::collections::BTreeSet;

use serde_json::{Value, json};

use crate::error::EngineError;
use crate::util::value_kind;

/// Expands a block document into the tree handed to markup rendering.
pub trait TreeEngine: Send + Sync {
    /// Produce the expanded tree for `doc`.
    fn apply(&self, doc: &Value) -> Result<Value, EngineError>;
}

/// Tree engine that expands a page root block into a full HTML document
/// skeleton.
///
/// Documents rooted at the configured page block become
/// `["<!DOCTYPE html>", html [head [meta, title, …head], body [content,
/// …scripts]]]`. Documents rooted at any other block pass through
/// unchanged.
#[derive(Clone, Debug)]
pub struct PageTreeEngine {
    page_block: String,
    declarations: Option<BTreeSet<String>>,
}

impl PageTreeEngine {
    /// Create an engine expanding the `page` block.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_block: "page".to_owned(),
            declarations: None,
        }
    }

    /// Use `name` as the page root block.
    #[must_use]
    pub fn with_page_block(mut self, name: impl Into<String>) -> Self {
        self.page_block = name.into();
        self
    }

    /// Restrict root blocks to the given declarations.
    ///
    /// With declarations set, a document rooted at an undeclared block
    /// is rejected instead of passed through.
    #[must_use]
    pub fn with_declarations<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations = Some(blocks.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for PageTreeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeEngine for PageTreeEngine {
    fn apply(&self, doc: &Value) -> Result<Value, EngineError> {
        let Some(map) = doc.as_object() else {
            return Err(EngineError::InvalidRoot(value_kind(doc)));
        };
        let block = map.get("block").and_then(Value::as_str);
        if let (Some(declared), Some(name)) = (&self.declarations, block) {
            if !declared.contains(name) {
                return Err(EngineError::UndeclaredBlock(name.to_owned()));
            }
        }
        if block != Some(self.page_block.as_str()) {
            return Ok(doc.clone());
        }

        let mut head = vec![
            json!({ "elem": "meta", "attrs": { "charset": "utf-8" } }),
            json!({
                "elem": "title",
                "content": map.get("title").cloned().unwrap_or(Value::Null),
            }),
        ];
        if let Some(Value::Array(entries)) = map.get("head") {
            head.extend(entries.iter().cloned());
        }

        let mut body = Vec::new();
        if let Some(content) = map.get("content") {
            if !content.is_null() {
                body.push(content.clone());
            }
        }
        if let Some(Value::Array(scripts)) = map.get("scripts") {
            body.extend(scripts.iter().cloned());
        }

        Ok(json!([
            "<!DOCTYPE html>",
            {
                "tag": "html",
                "content": [
                    { "tag": "head", "content": head },
                    { "block": self.page_block, "tag": "body", "content": body },
                ],
            },
        ]))
    }
}
