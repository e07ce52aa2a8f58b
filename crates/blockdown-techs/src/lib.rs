//! Build techs turning bundle markdown sources into rendered pages.
//!
//! # Architecture
//!
//! A tech is one step of a bundle build: it resolves its target name
//! from the bundle, reads its sources and produces the target content.
//!
//! - [`MarkdownTech`] joins a bundle's markdown fragments into one
//!   source file, wrapping each fragment in markers naming its path
//! - [`PageTech`] renders the joined markdown into a page, assembling
//!   a document whose `head`, `scripts` and `title` can be filled by
//!   conversion rules through the document context
//! - [`LegacyPageTech`] renders with the older document contract,
//!   where metadata travels as `TITLE:` and `HEAD:` comments inside
//!   the markdown itself
//!
//! # Example
//!
//! ```
//! use blockdown_bundle::MockBundle;
//! use blockdown_renderer::ConvertOptions;
//! use blockdown_techs::{PageOptions, PageTech};
//!
//! let bundle = MockBundle::new("bundle").with_file("bundle.markdown", "# Head");
//! let tech = PageTech::new(PageOptions::default(), ConvertOptions::default());
//! let html = tech.build(&bundle)?;
//! assert!(html.starts_with("<!DOCTYPE html>"));
//! assert!(html.contains(r#"<div class="content__h1">Head</div>"#));
//! # Ok::<(), blockdown_techs::TechError>(())
//! ```

mod error;
mod legacy;
mod markdown;
mod meta;
mod page;

pub use error::TechError;
pub use legacy::{LegacyPageOptions, LegacyPageTech};
pub use markdown::{MarkdownOptions, MarkdownTech};
pub use page::{AssetOption, PageOptions, PageTech};
