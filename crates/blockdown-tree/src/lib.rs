//! Document tree addressing for blockdown builds.
//!
//! Converted markdown becomes a tree of `serde_json::Value` nodes, and
//! conversion rules need to reach back into the root document (set a page
//! title, append head entries) while the content tree is still being built.
//! This crate provides:
//!
//! - [`path`]: dotted-path reads and writes over `Value` maps
//! - [`RootCtx`]: the mutable root-document handle rules write through,
//!   collecting warnings for recoverable misuse
//!
//! # Example
//!
//! ```
//! use blockdown_tree::RootCtx;
//! use serde_json::json;
//!
//! let mut ctx = RootCtx::new(json!({ "block": "page" }));
//! ctx.set("title", "Intro");
//! ctx.push("head", json!({ "elem": "css", "url": "app.css" }));
//! assert_eq!(
//!     ctx.into_root(),
//!     json!({
//!         "block": "page",
//!         "title": "Intro",
//!         "head": [{ "elem": "css", "url": "app.css" }],
//!     })
//! );
//! ```

mod ctx;
pub mod path;

pub use ctx::RootCtx;
