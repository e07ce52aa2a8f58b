//! Mock bundle for testing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::bundle::{Bundle, BundleError};

/// In-memory bundle for tests.
///
/// Populated through builder methods. Paths are stored as given and echoed
/// back unchanged by `relative_path`, so tests control marker text directly.
///
/// # Example
///
/// ```
/// use blockdown_bundle::{Bundle, MockBundle};
/// use std::path::Path;
///
/// let bundle = MockBundle::new("bundle").with_file("bundle.markdown", "# Hello");
/// assert_eq!(bundle.target_name("?.html"), "bundle.html");
/// assert_eq!(
///     bundle.read(Path::new("bundle.markdown")).unwrap(),
///     "# Hello"
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockBundle {
    name: String,
    contents: HashMap<PathBuf, String>,
}

impl MockBundle {
    /// Create an empty mock bundle with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: HashMap::new(),
        }
    }

    /// Add a source file with content.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.contents.insert(path.into(), content.into());
        self
    }
}

impl Bundle for MockBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn relative_path(&self, path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn read(&self, path: &Path) -> Result<String, BundleError> {
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| BundleError::not_found(path).with_backend("Mock"))
    }
}
