//! Markdown joining tech.

use blockdown_bundle::{Bundle, FileList};
use serde::Deserialize;

use crate::error::TechError;

/// Line separator between joined blocks.
const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Options for [`MarkdownTech`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Target mask for the joined file.
    pub target: String,
    /// Suffixes picking source files from the bundle file list.
    pub source_suffixes: Vec<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            target: "?.markdown".to_owned(),
            source_suffixes: vec!["markdown".to_owned()],
        }
    }
}

/// Joins a bundle's markdown sources into one target file.
///
/// Sources keep the file list's order. Each one is wrapped in begin/end
/// marker comments naming its bundle-relative path, so later stages can
/// attribute fragments back to their source files.
#[derive(Clone, Debug, Default)]
pub struct MarkdownTech {
    options: MarkdownOptions,
}

impl MarkdownTech {
    /// Create the tech with the given options.
    #[must_use]
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Tech name, as registered with the build system.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn name(&self) -> &'static str {
        "markdown"
    }

    /// Resolve the target name for `bundle`.
    #[must_use]
    pub fn target(&self, bundle: &dyn Bundle) -> String {
        bundle.target_name(&self.options.target)
    }

    /// Join the bundle's markdown sources into one string.
    ///
    /// An empty file list yields an empty string.
    pub fn build(&self, bundle: &dyn Bundle, files: &FileList) -> Result<String, TechError> {
        let mut blocks = Vec::new();
        for file in files.by_suffix(&self.options.source_suffixes) {
            let rel = bundle.relative_path(file.path());
            let data = bundle.read(file.path())?;
            blocks.push(format!(
                "<!-- begin: {rel} -->{EOL}{data}{EOL}<!-- end: {rel} -->"
            ));
        }
        Ok(blocks.join(EOL))
    }
}
