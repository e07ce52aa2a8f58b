//! Build bundle abstraction for blockdown techs.
//!
//! A bundle is one build target directory. Techs never touch the filesystem
//! directly; they go through the [`Bundle`] trait for target naming, marker
//! paths and source reads. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** for builds driven from other sources
//! - **Clean separation** between tech logic and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Bundle`] trait: `?`-mask target naming, marker-relative paths, reads
//! - [`FsBundle`] for on-disk build directories
//! - [`MockBundle`] for testing (behind `mock` feature flag)
//! - [`FileList`]/[`SourceFile`]: ordered source lists with first-dot
//!   suffix selection
//!
//! # Example
//!
//! ```
//! use blockdown_bundle::{Bundle, FileList, FsBundle};
//!
//! let bundle = FsBundle::new("out/index");
//! assert_eq!(bundle.target_name("?.html"), "index.html");
//!
//! let files = FileList::new()
//!     .with_file("blocks/intro.markdown")
//!     .with_file("blocks/intro.md");
//! assert_eq!(files.by_suffix(&["markdown"]).len(), 1);
//! ```

mod bundle;
mod file_list;
mod fs;
#[cfg(feature = "mock")]
mod mock;

pub use bundle::{Bundle, BundleError, BundleErrorKind};
pub use file_list::{FileList, SourceFile};
pub use fs::FsBundle;
#[cfg(feature = "mock")]
pub use mock::MockBundle;
