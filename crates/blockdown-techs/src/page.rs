//! Page rendering tech.

use std::path::Path;

use blockdown_bundle::Bundle;
use blockdown_renderer::{
    ConvertOptions, HtmlMarkupEngine, MarkdownConverter, MarkupEngine, PageTreeEngine, TreeEngine,
};
use blockdown_tree::RootCtx;
use serde::Deserialize;
use serde_json::json;

use crate::error::TechError;

/// A CSS or JS asset requirement.
///
/// `true` links the conventional minified bundle asset, `false` links
/// nothing, and a string is used as the asset mask itself.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AssetOption {
    /// Enable or disable the default asset.
    Toggle(bool),
    /// Asset mask, with `?` expanding to the bundle name.
    Url(String),
}

impl Default for AssetOption {
    fn default() -> Self {
        Self::Toggle(true)
    }
}

impl AssetOption {
    /// Resolve to an asset URL for `bundle`, `None` when disabled.
    #[must_use]
    pub fn resolve(&self, bundle: &dyn Bundle, default_mask: &str) -> Option<String> {
        match self {
            Self::Toggle(false) => None,
            Self::Toggle(true) => Some(bundle.target_name(default_mask)),
            Self::Url(mask) => Some(bundle.target_name(mask)),
        }
    }
}

/// Options for [`PageTech`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Target mask for the rendered page.
    pub target: String,
    /// Target mask of the joined markdown source.
    pub markdown: String,
    /// Root block of the assembled document.
    pub root_block: String,
    /// CSS asset linked from the document head.
    pub require_css: AssetOption,
    /// JS asset appended to the document scripts.
    pub require_js: AssetOption,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            target: "?.html".to_owned(),
            markdown: "?.markdown".to_owned(),
            root_block: "page".to_owned(),
            require_css: AssetOption::default(),
            require_js: AssetOption::default(),
        }
    }
}

/// Renders a bundle's joined markdown into a page.
///
/// A build assembles a fresh document rooted at the configured block,
/// pushes the required assets into its `head` and `scripts` sequences,
/// converts the markdown into the document `content` and runs the tree
/// and markup engines over the result. Conversion rules run against the
/// build's own document context, so concurrent builds never observe
/// each other's mutations.
pub struct PageTech {
    options: PageOptions,
    convert: ConvertOptions,
    tree: Box<dyn TreeEngine>,
    markup: Box<dyn MarkupEngine>,
}

impl PageTech {
    /// Create the tech with default engines.
    #[must_use]
    pub fn new(options: PageOptions, convert: ConvertOptions) -> Self {
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
        "page"
    }

    /// Resolve the page target name for `bundle`.
    #[must_use]
    pub fn target(&self, bundle: &dyn Bundle) -> String {
        bundle.target_name(&self.options.target)
    }

    /// Resolve the markdown source target name for `bundle`.
    #[must_use]
    pub fn markdown_target(&self, bundle: &dyn Bundle) -> String {
        bundle.target_name(&self.options.markdown)
    }

    /// Build the page from the bundle's markdown source target.
    pub fn build(&self, bundle: &dyn Bundle) -> Result<String, TechError> {
        let source = self.markdown_target(bundle);
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
        let mut ctx = RootCtx::new(json!({ "block": self.options.root_block }));
        if let Some(url) = self.options.require_css.resolve(bundle, "?.min.css") {
            ctx.push("head", json!({ "elem": "css", "url": url }));
        }
        if let Some(url) = self.options.require_js.resolve(bundle, "?.min.js") {
            ctx.push("scripts", json!({ "elem": "js", "url": url }));
        }

        // A fresh converter per build keeps rule state out of shared scope
        let converter = MarkdownConverter::new(self.convert.clone());
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
