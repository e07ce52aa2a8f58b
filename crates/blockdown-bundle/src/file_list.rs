//! Ordered source file lists with suffix-based selection.

use std::path::{Path, PathBuf};

/// A source file known to the build, with its derived suffix.
///
/// The suffix is everything after the first dot of the file name, so
/// `block_part_1.markdown` has suffix `markdown` and `app.min.css` has
/// suffix `min.css`. A file name without a dot has the empty suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    suffix: String,
}

impl SourceFile {
    /// Describe a source file, deriving the suffix from the file name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let suffix = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split_once('.'))
            .map(|(_, suffix)| suffix.to_owned())
            .unwrap_or_default();
        Self { path, suffix }
    }

    /// Path as recorded in the list.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Suffix after the first dot of the file name.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Ordered list of source files feeding one build.
///
/// Order is significant: joined output follows list order, so the order in
/// which files are added is the order in which they are built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileList {
    files: Vec<SourceFile>,
}

impl FileList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to the end of the list.
    pub fn add(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    /// Append a file by path.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.add(SourceFile::new(path));
        self
    }

    /// All files in list order.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Files whose suffix exactly matches one of `suffixes`, in list order.
    #[must_use]
    pub fn by_suffix<S: AsRef<str>>(&self, suffixes: &[S]) -> Vec<&SourceFile> {
        self.files
            .iter()
            .filter(|file| suffixes.iter().any(|s| s.as_ref() == file.suffix()))
            .collect()
    }

    /// Number of files in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the list holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<SourceFile> for FileList {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
