//! Dotted-path addressing over document tree values.
//!
//! Paths like `"a.b.c"` descend through nested maps, one segment per key.
//! Reads never mutate; writes create intermediate maps as needed. Sequences
//! are never created implicitly by a write.

use serde_json::{Map, Value};

/// Resolve a dotted path to a reference into the tree.
///
/// Returns `None` when a segment is missing or when a non-map value sits in
/// the middle of the path.
///
/// # Examples
///
/// ```
/// use blockdown_tree::path;
/// use serde_json::json;
///
/// let doc = json!({ "page": { "title": "Intro" } });
/// assert_eq!(path::get(&doc, "page.title"), Some(&json!("Intro")));
/// assert_eq!(path::get(&doc, "page.missing"), None);
/// ```
#[must_use]
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

/// Mutable counterpart of [`get`].
#[must_use]
pub fn get_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object_mut()?.get_mut(key))
}

/// Write `value` at the dotted path, creating intermediate maps.
///
/// An intermediate segment holding anything other than a map is replaced by
/// a fresh map; the previous leaf value is overwritten.
///
/// # Examples
///
/// ```
/// use blockdown_tree::path;
/// use serde_json::{Value, json};
///
/// let mut doc = json!({});
/// path::set(&mut doc, "meta.og.title", Value::from("Intro"));
/// assert_eq!(doc, json!({ "meta": { "og": { "title": "Intro" } } }));
/// ```
pub fn set(root: &mut Value, path: &str, value: Value) {
    let (prefix, leaf) = match path.rsplit_once('.') {
        Some((prefix, leaf)) => (Some(prefix), leaf),
        None => (None, path),
    };
    let mut node = root;
    if let Some(prefix) = prefix {
        for key in prefix.split('.') {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = &mut node[key];
        }
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node[leaf] = value;
}
