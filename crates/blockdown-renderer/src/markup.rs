//! Tree to HTML markup rendering.

use std::fmt::Write;

use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::util::escape_html;

/// Tags with no closing counterpart.
const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Renders an expanded tree into a markup string.
pub trait MarkupEngine: Send + Sync {
    /// Render `tree` to markup.
    fn apply(&self, tree: &Value) -> Result<String, EngineError>;
}

/// HTML renderer for block trees.
///
/// Map nodes become elements with a class derived from their `block`,
/// `elem` and the enclosing block scope: `block` alone yields `block`,
/// `block` plus `elem` yields `block__elem`, a bare `elem` joins the
/// scope as `scope__elem`. Strings pass through raw, sequences
/// concatenate, `null` and booleans render nothing.
///
/// The `css`, `js`, `meta` and `title` elems have fixed service
/// templates matching their conventional head markup.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlMarkupEngine;

impl HtmlMarkupEngine {
    /// Create the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupEngine for HtmlMarkupEngine {
    fn apply(&self, tree: &Value) -> Result<String, EngineError> {
        let mut out = String::new();
        render_value(&mut out, tree, None);
        Ok(out)
    }
}

fn render_value(out: &mut String, value: &Value, scope: Option<&str>) {
    match value {
        Value::Null | Value::Bool(_) => {}
        Value::Number(n) => write!(out, "{n}").unwrap(),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                render_value(out, item, scope);
            }
        }
        Value::Object(map) => render_node(out, map, scope),
    }
}

fn render_node(out: &mut String, map: &Map<String, Value>, scope: Option<&str>) {
    let elem = map.get("elem").and_then(Value::as_str);
    match elem {
        Some("css") => {
            if let Some(url) = map.get("url").and_then(Value::as_str) {
                write!(out, r#"<link rel="stylesheet" href="{}">"#, escape_html(url)).unwrap();
                return;
            }
        }
        Some("js") => {
            if let Some(url) = map.get("url").and_then(Value::as_str) {
                write!(out, r#"<script src="{}"></script>"#, escape_html(url)).unwrap();
                return;
            }
        }
        Some("meta") => {
            out.push_str("<meta");
            render_attrs(out, map.get("attrs"));
            out.push('>');
            return;
        }
        Some("title") => {
            let mut text = String::new();
            collect_text(&mut text, map.get("content").unwrap_or(&Value::Null));
            write!(out, "<title>{}</title>", escape_html(&text)).unwrap();
            return;
        }
        _ => {}
    }

    let tag = map.get("tag").and_then(Value::as_str).unwrap_or("div");
    let block = map.get("block").and_then(Value::as_str);
    let mut class = match (block, elem) {
        (Some(b), Some(e)) => Some(format!("{b}__{e}")),
        (Some(b), None) => Some(b.to_owned()),
        (None, Some(e)) => match scope {
            Some(s) => Some(format!("{s}__{e}")),
            None => Some(e.to_owned()),
        },
        (None, None) => None,
    };
    let attrs = map.get("attrs").and_then(Value::as_object);
    if let Some(extra) = attrs.and_then(|a| a.get("class")).and_then(Value::as_str) {
        class = Some(match class {
            Some(base) => format!("{base} {extra}"),
            None => extra.to_owned(),
        });
    }

    write!(out, "<{tag}").unwrap();
    if let Some(class) = &class {
        write!(out, r#" class="{}""#, escape_html(class)).unwrap();
    }
    render_attrs(out, map.get("attrs"));
    out.push('>');
    if VOID_TAGS.contains(&tag) {
        return;
    }
    if let Some(content) = map.get("content") {
        render_value(out, content, block.or(scope));
    }
    write!(out, "</{tag}>").unwrap();
}

fn render_attrs(out: &mut String, attrs: Option<&Value>) {
    let Some(Value::Object(attrs)) = attrs else {
        return;
    };
    // The map iterates in key order, so attribute order is deterministic
    for (name, value) in attrs {
        if name == "class" {
            continue;
        }
        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => write!(out, " {name}").unwrap(),
            Value::String(s) => write!(out, r#" {name}="{}""#, escape_html(s)).unwrap(),
            other => write!(out, r#" {name}="{}""#, escape_html(&other.to_string())).unwrap(),
        }
    }
}

/// Gather the plain text of a node tree, ignoring structure.
fn collect_text(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::Bool(_) => {}
        Value::Number(n) => write!(out, "{n}").unwrap(),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect_text(out, item);
            }
        }
        Value::Object(map) => {
            if let Some(content) = map.get("content") {
                collect_text(out, content);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn render(tree: &Value) -> String {
        HtmlMarkupEngine::new().apply(tree).unwrap()
    }

    #[test]
    fn test_block_node_renders_div_with_class() {
        assert_eq!(render(&json!({ "block": "page" })), r#"<div class="page"></div>"#);
    }

    #[test]
    fn test_block_elem_class() {
        assert_eq!(
            render(&json!({ "block": "page", "elem": "inner" })),
            r#"<div class="page__inner"></div>"#
        );
    }

    #[test]
    fn test_elem_joins_enclosing_block_scope() {
        assert_eq!(
            render(&json!({
                "block": "content",
                "content": { "elem": "h1", "content": "Head" },
            })),
            r#"<div class="content"><div class="content__h1">Head</div></div>"#
        );
    }

    #[test]
    fn test_scope_survives_plain_tag_nodes() {
        assert_eq!(
            render(&json!({
                "block": "md",
                "content": { "tag": "section", "content": { "elem": "x" } },
            })),
            r#"<div class="md"><section><div class="md__x"></div></section></div>"#
        );
    }

    #[test]
    fn test_nested_block_resets_scope() {
        assert_eq!(
            render(&json!({
                "block": "outer",
                "content": { "block": "inner", "content": { "elem": "e" } },
            })),
            r#"<div class="outer"><div class="inner"><div class="inner__e"></div></div></div>"#
        );
    }

    #[test]
    fn test_bare_elem_without_scope() {
        assert_eq!(render(&json!({ "elem": "lone" })), r#"<div class="lone"></div>"#);
    }

    #[test]
    fn test_explicit_tag_replaces_div() {
        assert_eq!(
            render(&json!({ "block": "page", "tag": "body", "content": "x" })),
            r#"<body class="page">x</body>"#
        );
    }

    #[test]
    fn test_tag_only_node_has_no_class() {
        assert_eq!(render(&json!({ "tag": "html", "content": "x" })), "<html>x</html>");
    }

    #[test]
    fn test_strings_pass_through_raw() {
        assert_eq!(render(&json!("<!DOCTYPE html>")), "<!DOCTYPE html>");
    }

    #[test]
    fn test_sequence_concatenates() {
        assert_eq!(render(&json!(["a", { "tag": "br" }, "b"])), "a<br>b");
    }

    #[test]
    fn test_null_and_bools_render_nothing() {
        assert_eq!(render(&json!([null, true, false, "x"])), "x");
    }

    #[test]
    fn test_numbers_render() {
        assert_eq!(render(&json!({ "tag": "span", "content": 42 })), "<span>42</span>");
    }

    #[test]
    fn test_attrs_render_in_key_order() {
        assert_eq!(
            render(&json!({
                "tag": "a",
                "attrs": { "href": "/x", "data-id": "7" },
            })),
            r#"<a data-id="7" href="/x"></a>"#
        );
    }

    #[test]
    fn test_attr_values_are_escaped() {
        assert_eq!(
            render(&json!({ "tag": "a", "attrs": { "href": "/?a=1&b=\"2\"" } })),
            r#"<a href="/?a=1&amp;b=&quot;2&quot;"></a>"#
        );
    }

    #[test]
    fn test_boolean_attrs() {
        assert_eq!(
            render(&json!({
                "tag": "input",
                "attrs": { "disabled": true, "checked": false, "name": null },
            })),
            "<input disabled>"
        );
    }

    #[test]
    fn test_class_attr_merges_with_derived_class() {
        assert_eq!(
            render(&json!({ "block": "b", "attrs": { "class": "extra" } })),
            r#"<div class="b extra"></div>"#
        );
        assert_eq!(
            render(&json!({ "tag": "h1", "attrs": { "class": "head" }, "content": "Head 1" })),
            r#"<h1 class="head">Head 1</h1>"#
        );
    }

    #[test]
    fn test_void_tags_have_no_closing_tag() {
        assert_eq!(render(&json!({ "tag": "hr", "content": "ignored" })), "<hr>");
        assert_eq!(
            render(&json!({ "tag": "img", "attrs": { "src": "x.png" } })),
            r#"<img src="x.png">"#
        );
    }

    #[test]
    fn test_css_service_elem() {
        assert_eq!(
            render(&json!({ "elem": "css", "url": "bundle.min.css" })),
            r#"<link rel="stylesheet" href="bundle.min.css">"#
        );
    }

    #[test]
    fn test_js_service_elem() {
        assert_eq!(
            render(&json!({ "elem": "js", "url": "bundle.min.js" })),
            r#"<script src="bundle.min.js"></script>"#
        );
    }

    #[test]
    fn test_meta_service_elem() {
        assert_eq!(
            render(&json!({ "elem": "meta", "attrs": { "charset": "utf-8" } })),
            r#"<meta charset="utf-8">"#
        );
        assert_eq!(
            render(&json!({
                "elem": "meta",
                "attrs": { "property": "og:title", "content": "Head 1" },
            })),
            r#"<meta content="Head 1" property="og:title">"#
        );
    }

    #[test]
    fn test_title_service_elem_flattens_and_escapes() {
        assert_eq!(
            render(&json!({ "elem": "title", "content": "Rock & Roll" })),
            "<title>Rock &amp; Roll</title>"
        );
        assert_eq!(
            render(&json!({ "elem": "title", "content": ["Head 1", "Head 2"] })),
            "<title>Head 1Head 2</title>"
        );
        assert_eq!(render(&json!({ "elem": "title", "content": null })), "<title></title>");
    }

    #[test]
    fn test_css_without_url_renders_generic() {
        assert_eq!(render(&json!({ "elem": "css" })), r#"<div class="css"></div>"#);
    }
}
