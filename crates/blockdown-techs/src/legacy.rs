//! Legacy page rendering tech.
//!
//! Kept for bundles built against the older document contract: the
//! root block is always `page` with pre-seeded `head` and `scripts`
//! sequences, and page metadata travels inside the markdown itself as
//! `TITLE:` and `HEAD:` comments instead of context-aware rules. A
//! built-in filter runs over every HTML node to strip fragment markers
//! and collect that metadata; a user-supplied HTML rule still applies,
//! and its output is what the filter sees.

use std::path::Path;
use std::sync::LazyLock;

use blockdown_bundle::Bundle;
use blockdown_renderer::{
    ConvertOptions, HtmlMarkupEngine, MarkdownConverter, MarkupEngine, NodeArgs, NodeKind,
    PageTreeEngine, Rule, TreeEngine,
};
use blockdown_tree::RootCtx;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::TechError;
use crate::meta::{MetaEntry, parse_meta_comment};
use crate::page::AssetOption;

static FRAGMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!-- (begin|end):.+$").expect("invalid marker regex"));

/// Options for [`LegacyPageTech`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LegacyPageOptions {
    /// Target mask for the rendered page.
    pub target: String,
    /// Target mask of the joined markdown source.
    pub markdown: String,
    /// CSS asset linked from the document head.
    pub require_css: AssetOption,
    /// JS asset appended to the document scripts.
    pub require_js: AssetOption,
}

impl Default for LegacyPageOptions {
    fn default() -> Self {
        Self {
            target: "?.html".to_owned(),
            markdown: "?.markdown".to_owned(),
            require_css: AssetOption::default(),
            require_js: AssetOption::default(),
        }
    }
}

/// Renders joined markdown with the legacy document contract.
pub struct LegacyPageTech {
    options: LegacyPageOptions,
    convert: ConvertOptions,
    tree: Box<dyn TreeEngine>,
    markup: Box<dyn MarkupEngine>,
}

impl LegacyPageTech {
    /// Create the tech with default engines.
    #[must_use]
    pub fn new(options: LegacyPageOptions, convert: ConvertOptions) -> Self {
        Self {
            options,
            convert,
            tree: Box::new(PageTreeEngine::new()),
            markup: Box::new(HtmlMarkupEngine::new()),
        }
    }

    /// Replace the tree and markup engines.
    #[must_use]
    pub fn with_engines(
        mut self,
        tree: Box<dyn TreeEngine>,
        markup: Box<dyn MarkupEngine>,
    ) -> Self {
        self.tree = tree;
        self.markup = markup;
        self
    }

    /// Tech name, as registered with the build system.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn name(&self) -> &'static str {
        "page-legacy"
    }

    /// Resolve the page target name for `bundle`.
    #[must_use]
    pub fn target(&self, bundle: &dyn Bundle) -> String {
        bundle.target_name(&self.options.target)
    }

    /// Build the page from the bundle's markdown source target.
    pub fn build(&self, bundle: &dyn Bundle) -> Result<String, TechError> {
        let source = bundle.target_name(&self.options.markdown);
        let markdown = bundle.read(Path::new(&source))?;
        self.build_from_markdown(bundle, &markdown)
    }

    /// Build the page from already-joined markdown text.
    pub fn build_from_markdown(
        &self,
        bundle: &dyn Bundle,
        markdown: &str,
    ) -> Result<String, TechError> {
        let target = self.target(bundle);
        let mut ctx = RootCtx::new(json!({ "block": "page", "head": [], "scripts": [] }));
        if let Some(url) = self.options.require_css.resolve(bundle, "?.min.css") {
            ctx.push("head", json!({ "elem": "css", "url": url }));
        }
        if let Some(url) = self.options.require_js.resolve(bundle, "?.min.js") {
            ctx.push("scripts", json!({ "elem": "js", "url": url }));
        }

        let mut options = self.convert.clone();
        let user_rule = options.rules.get(NodeKind::Html).cloned();
        options.rules.insert(NodeKind::Html, compose_html_rule(user_rule));
        let converter = MarkdownConverter::new(options);
        let content = converter.convert(markdown, &mut ctx);
        for warning in ctx.take_warnings() {
            tracing::warn!(target_name = %target, tech = self.name(), "{warning}");
        }

        let mut doc = ctx.into_root();
        doc["content"] = content;
        let tree = self.tree.apply(&doc)?;
        Ok(self.markup.apply(&tree)?)
    }
}

/// Chain the user HTML rule, if any, with the built-in metadata filter.
fn compose_html_rule(user: Option<Rule>) -> Rule {
    Rule::with_ctx(move |args, ctx| {
        let value = match &user {
            Some(rule) => rule.apply(args, ctx),
            None => match args {
                NodeArgs::Html { html } => Value::String(html.clone()),
                _ => Value::Null,
            },
        };
        filter_value(value, ctx)
    })
}

fn filter_value(value: Value, ctx: &mut RootCtx) -> Value {
    match value {
        Value::String(text) => Value::String(filter_text(&text, ctx)),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| filter_value(v, ctx)).collect())
        }
        other => other,
    }
}

/// Strip fragment markers and metadata comments from an HTML fragment.
///
/// Recognized metadata lines mutate the document through `ctx`. Text
/// with no recognized lines is returned unchanged; text left blank by
/// the filtering collapses to an empty string so the node is dropped.
fn filter_text(text: &str, ctx: &mut RootCtx) -> String {
    if !text.is_empty() && text.trim().is_empty() {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut changed = false;
    for line in text.lines() {
        if FRAGMENT_MARKER.is_match(line.trim()) {
            changed = true;
            continue;
        }
        match parse_meta_comment(line) {
            Some(Ok(MetaEntry::Title(title))) => {
                ctx.set("title", title);
                changed = true;
            }
            Some(Ok(MetaEntry::Head(entry))) => {
                ctx.push("head", entry);
                changed = true;
            }
            Some(Err(err)) => {
                ctx.warn(format!("invalid HEAD entry: {err}"));
                changed = true;
            }
            None => kept.push(line),
        }
    }
    if !changed {
        return text.to_owned();
    }
    let joined = kept.join("\n");
    if joined.trim().is_empty() {
        String::new()
    } else {
        joined
    }
}
