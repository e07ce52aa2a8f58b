//! Filesystem bundle backend.

use std::path::{Component, Path, PathBuf};

use crate::bundle::{Bundle, BundleError};

/// Bundle rooted at a build directory on disk.
///
/// The bundle name is the directory's file name, so `out/pages/index` names
/// its targets `index.html`, `index.min.css` and so on.
#[derive(Clone, Debug)]
pub struct FsBundle {
    dir: PathBuf,
    name: String,
}

impl FsBundle {
    /// Create a bundle for a build directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let name = dir
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        Self { dir, name }
    }

    /// The bundle directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Bundle for FsBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn relative_path(&self, path: &Path) -> String {
        let target: Vec<Component<'_>> = path.components().collect();
        if path.is_relative() {
            // already bundle-relative
            return join_slash(&target);
        }
        let base: Vec<Component<'_>> = self.dir.components().collect();
        let common = base
            .iter()
            .zip(&target)
            .take_while(|(a, b)| a == b)
            .count();
        let mut parts = vec!["..".to_owned(); base.len() - common];
        parts.extend(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        if parts.is_empty() {
            ".".to_owned()
        } else {
            parts.join("/")
        }
    }

    fn read(&self, path: &Path) -> Result<String, BundleError> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        };
        std::fs::read_to_string(&full)
            .map_err(|err| BundleError::io(err, Some(full)).with_backend("Fs"))
    }
}

fn join_slash(components: &[Component<'_>]) -> String {
    components
        .iter()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use crate::bundle::BundleErrorKind;

    use super::*;

    #[test]
    fn test_name_is_directory_file_name() {
        let bundle = FsBundle::new("/build/pages/index");
        assert_eq!(bundle.name(), "index");
    }

    #[test]
    fn test_target_name_expands_mask() {
        let bundle = FsBundle::new("/build/pages/index");
        assert_eq!(bundle.target_name("?.html"), "index.html");
        assert_eq!(bundle.target_name("?.min.css"), "index.min.css");
    }

    #[test]
    fn test_relative_path_inside_bundle() {
        let bundle = FsBundle::new("/build/index");
        assert_eq!(
            bundle.relative_path(Path::new("/build/index/index.markdown")),
            "index.markdown"
        );
    }

    #[test]
    fn test_relative_path_outside_bundle() {
        let bundle = FsBundle::new("/build/index");
        assert_eq!(
            bundle.relative_path(Path::new("/blocks/intro/intro.markdown")),
            "../../blocks/intro/intro.markdown"
        );
    }

    #[test]
    fn test_relative_path_sibling_directory() {
        let bundle = FsBundle::new("/build/index");
        assert_eq!(
            bundle.relative_path(Path::new("/build/common/common.markdown")),
            "../common/common.markdown"
        );
    }

    #[test]
    fn test_relative_path_passes_relative_input_through() {
        let bundle = FsBundle::new("/build/index");
        assert_eq!(
            bundle.relative_path(Path::new("index.markdown")),
            "index.markdown"
        );
    }

    #[test]
    fn test_read_absolute_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("index");
        fs::create_dir(&bundle_dir).unwrap();
        fs::write(bundle_dir.join("index.markdown"), "# Hello").unwrap();

        let bundle = FsBundle::new(&bundle_dir);
        assert_eq!(
            bundle.read(Path::new("index.markdown")).unwrap(),
            "# Hello"
        );
        assert_eq!(
            bundle.read(&bundle_dir.join("index.markdown")).unwrap(),
            "# Hello"
        );
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = FsBundle::new(dir.path());
        let err = bundle.read(Path::new("missing.markdown")).unwrap_err();
        assert_eq!(err.kind, BundleErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }
}
