//! Bundle trait and error types.
//!
//! A bundle is one build target directory: it names output targets, resolves
//! source paths for fragment marker comments, and reads source files.
//! Implementations decide where the bytes actually live.

use std::path::{Path, PathBuf};

/// Semantic error categories for bundle I/O.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BundleErrorKind {
    /// Source file does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or target mask.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Bundle error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct BundleError {
    /// Semantic error category.
    pub kind: BundleErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BundleError {
    /// Create a new bundle error.
    #[must_use]
    pub fn new(kind: BundleErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(BundleErrorKind::NotFound).with_path(path)
    }

    /// Create a bundle error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => BundleErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => BundleErrorKind::PermissionDenied,
            _ => BundleErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for BundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            BundleErrorKind::NotFound => "Not found",
            BundleErrorKind::PermissionDenied => "Permission denied",
            BundleErrorKind::InvalidPath => "Invalid path",
            BundleErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for BundleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Build bundle the techs run against.
///
/// Path parameters are source file paths as recorded in a [`FileList`];
/// bundle name substitution turns `?` masks like `?.min.css` into concrete
/// target names like `index.min.css`.
///
/// [`FileList`]: crate::FileList
pub trait Bundle: Send + Sync {
    /// Bundle name, substituted for `?` in target masks.
    fn name(&self) -> &str;

    /// Expand a target mask, replacing every `?` with the bundle name.
    fn target_name(&self, mask: &str) -> String {
        mask.replace('?', self.name())
    }

    /// Path of `path` relative to the bundle directory, as written into
    /// fragment marker comments.
    fn relative_path(&self, path: &Path) -> String;

    /// Read a source file.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &Path) -> Result<String, BundleError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_bundle_error_new() {
        let err = BundleError::new(BundleErrorKind::NotFound);
        assert_eq!(err.kind, BundleErrorKind::NotFound);
        assert_eq!(err.path, None);
        assert_eq!(err.backend, None);
    }

    #[test]
    fn test_bundle_error_with_path() {
        let err = BundleError::new(BundleErrorKind::NotFound).with_path("/docs/index.markdown");
        assert_eq!(err.path, Some(PathBuf::from("/docs/index.markdown")));
    }

    #[test]
    fn test_bundle_error_with_backend() {
        let err = BundleError::new(BundleErrorKind::Other).with_backend("Fs");
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_bundle_error_with_source_downcasts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BundleError::new(BundleErrorKind::PermissionDenied).with_source(io);
        let source: &std::io::Error = err.downcast_source().unwrap();
        assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_bundle_error_display_full() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BundleError::new(BundleErrorKind::NotFound)
            .with_backend("Fs")
            .with_source(io)
            .with_path("/docs/index.markdown");
        assert_eq!(
            err.to_string(),
            "[Fs] Not found: no such file (path: /docs/index.markdown)"
        );
    }

    #[test]
    fn test_bundle_error_display_minimal() {
        let err = BundleError::new(BundleErrorKind::Other);
        assert_eq!(err.to_string(), "Error");
    }

    #[test]
    fn test_bundle_error_not_found_helper() {
        let err = BundleError::not_found("bundle.markdown");
        assert_eq!(err.kind, BundleErrorKind::NotFound);
        assert_eq!(err.path, Some(PathBuf::from("bundle.markdown")));
    }

    #[test]
    fn test_bundle_error_io_maps_kinds() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            BundleError::io(not_found, None).kind,
            BundleErrorKind::NotFound
        );

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            BundleError::io(denied, None).kind,
            BundleErrorKind::PermissionDenied
        );

        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert_eq!(BundleError::io(broken, None).kind, BundleErrorKind::Other);
    }

    #[test]
    fn test_bundle_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BundleError::io(io, Some(PathBuf::from("a.markdown")));
        assert!(std::error::Error::source(&err).is_some());
    }
}
