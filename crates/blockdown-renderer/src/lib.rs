//! Markdown rendering through a block document tree.
//!
//! # Architecture
//!
//! Rendering runs in three stages:
//!
//! - [`MarkdownConverter`] parses markdown and converts each construct
//!   into a tree node, consulting the [`Rules`] registry so callers can
//!   override any construct's rendition or collect data into a
//!   [`RootCtx`](blockdown_tree::RootCtx)
//! - a [`TreeEngine`] expands the assembled document, with
//!   [`PageTreeEngine`] turning a page root block into a full HTML
//!   document skeleton
//! - a [`MarkupEngine`] renders the expanded tree, with
//!   [`HtmlMarkupEngine`] producing HTML with block-derived classes
//!
//! # Example
//!
//! ```
//! use blockdown_renderer::{
//!     ConvertOptions, HtmlMarkupEngine, MarkdownConverter, MarkupEngine,
//! };
//! use blockdown_tree::RootCtx;
//!
//! let converter = MarkdownConverter::new(ConvertOptions::default());
//! let mut ctx = RootCtx::new(serde_json::json!({}));
//! let content = converter.convert("# Head", &mut ctx);
//! let html = HtmlMarkupEngine::new().apply(&content)?;
//! assert_eq!(
//!     html,
//!     r#"<div class="content"><div class="content__h1">Head</div></div>"#
//! );
//! # Ok::<(), blockdown_renderer::EngineError>(())
//! ```

mod converter;
mod error;
mod markup;
mod rules;
mod tree;
mod util;

pub use converter::{ConvertOptions, MarkdownConverter};
pub use error::EngineError;
pub use markup::{HtmlMarkupEngine, MarkupEngine};
pub use rules::{CtxRuleFn, NodeArgs, NodeKind, PlainRuleFn, Rule, Rules};
pub use tree::{PageTreeEngine, TreeEngine};
pub use util::escape_html;
