//! Mutable root-document context handed to conversion rules.

use serde_json::Value;

use crate::path;

/// Mutable handle on the root document of a single build.
///
/// Conversion rules address the document through dotted paths instead of
/// holding references into it, so a rule can set the page title or append
/// head entries while the content tree is still being assembled. Recoverable
/// misuse (appending to a slot that is not a sequence) is recorded as a
/// warning rather than failing the build.
#[derive(Debug)]
pub struct RootCtx {
    root: Value,
    warnings: Vec<String>,
}

impl RootCtx {
    /// Wrap a root document.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self {
            root,
            warnings: Vec::new(),
        }
    }

    /// The document in its current state.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Unwrap the document.
    #[must_use]
    pub fn into_root(self) -> Value {
        self.root
    }

    /// Write `value` at `path`, overwriting whatever is there.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        path::set(&mut self.root, path, value.into());
    }

    /// Write `value` at `path` unless the slot already holds something.
    ///
    /// An absent slot and a slot holding the empty string both count as
    /// unoccupied; any other present value is kept.
    pub fn set_default(&mut self, path: &str, value: impl Into<Value>) {
        let occupied = match path::get(&self.root, path) {
            Some(current) => current.as_str() != Some(""),
            None => false,
        };
        if !occupied {
            path::set(&mut self.root, path, value.into());
        }
    }

    /// Append `value` to the sequence at `path`.
    ///
    /// An absent slot becomes a fresh one-element sequence. A slot holding a
    /// non-sequence value is left untouched and one warning is recorded.
    pub fn push(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        match path::get(&self.root, path).map(Value::is_array) {
            Some(true) => {
                if let Some(Value::Array(items)) = path::get_mut(&mut self.root, path) {
                    items.push(value);
                }
            }
            Some(false) => self.warn(format!("cannot append at \"{path}\": not a sequence")),
            None => path::set(&mut self.root, path, Value::Array(vec![value])),
        }
    }

    /// Record a non-fatal build warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Drain the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_writes_value() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.set("title", "Intro");
        assert_eq!(ctx.root(), &json!({ "title": "Intro" }));
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let mut ctx = RootCtx::new(json!({ "title": "Old" }));
        ctx.set("title", "New");
        assert_eq!(ctx.root(), &json!({ "title": "New" }));
    }

    #[test]
    fn test_set_nested_path() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.set("meta.og.title", "Intro");
        assert_eq!(
            ctx.root(),
            &json!({ "meta": { "og": { "title": "Intro" } } })
        );
    }

    #[test]
    fn test_set_default_fills_absent_slot() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.set_default("title", "First");
        assert_eq!(ctx.root(), &json!({ "title": "First" }));
    }

    #[test]
    fn test_set_default_fills_empty_string() {
        let mut ctx = RootCtx::new(json!({ "title": "" }));
        ctx.set_default("title", "First");
        assert_eq!(ctx.root(), &json!({ "title": "First" }));
    }

    #[test]
    fn test_set_default_keeps_existing_value() {
        let mut ctx = RootCtx::new(json!({ "title": "First" }));
        ctx.set_default("title", "Second");
        assert_eq!(ctx.root(), &json!({ "title": "First" }));
    }

    #[test]
    fn test_set_default_keeps_non_string_value() {
        let mut ctx = RootCtx::new(json!({ "count": 0 }));
        ctx.set_default("count", 5);
        assert_eq!(ctx.root(), &json!({ "count": 0 }));
    }

    #[test]
    fn test_push_creates_sequence_when_absent() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.push("head", json!({ "elem": "css" }));
        assert_eq!(ctx.root(), &json!({ "head": [{ "elem": "css" }] }));
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut ctx = RootCtx::new(json!({ "head": [] }));
        ctx.push("head", "a");
        ctx.push("head", "b");
        assert_eq!(ctx.root(), &json!({ "head": ["a", "b"] }));
    }

    #[test]
    fn test_push_creates_intermediate_maps() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.push("meta.tags", "rust");
        assert_eq!(ctx.root(), &json!({ "meta": { "tags": ["rust"] } }));
    }

    #[test]
    fn test_push_to_non_sequence_warns_once_and_keeps_value() {
        let mut ctx = RootCtx::new(json!({ "title": "Intro" }));
        ctx.push("title", "More");
        assert_eq!(ctx.root(), &json!({ "title": "Intro" }));
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("title"));
    }

    #[test]
    fn test_push_to_map_leaf_warns() {
        let mut ctx = RootCtx::new(json!({ "meta": { "a": 1 } }));
        ctx.push("meta", "x");
        assert_eq!(ctx.root(), &json!({ "meta": { "a": 1 } }));
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_take_warnings_drains() {
        let mut ctx = RootCtx::new(json!({ "title": 1 }));
        ctx.push("title", "x");
        let warnings = ctx.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_warn_records_message() {
        let mut ctx = RootCtx::new(json!({}));
        ctx.warn("something odd");
        assert_eq!(ctx.warnings(), ["something odd".to_owned()]);
    }

    #[test]
    fn test_into_root_returns_document() {
        let mut ctx = RootCtx::new(json!({ "block": "page" }));
        ctx.set("title", "Intro");
        assert_eq!(
            ctx.into_root(),
            json!({ "block": "page", "title": "Intro" })
        );
    }
}
