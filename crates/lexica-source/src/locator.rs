use std::fmt;
use std::path::{Path, PathBuf};

/// Where a logical content item lives.
///
/// Constructed once, read-only thereafter. The three shapes cover a plain
/// file, an entry of a zip archive, and an entry nested inside an archive
/// that is itself an entry of an outer archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentLocator {
    /// A plain file on the file system.
    File(PathBuf),
    /// A named entry of a zip archive.
    ArchiveEntry { archive: PathBuf, entry: String },
    /// A named entry of an embedded archive, which is itself the named
    /// outer entry of a zip archive.
    NestedArchiveEntry {
        archive: PathBuf,
        outer: String,
        inner: String,
    },
}

impl ContentLocator {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn archive_entry(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self::ArchiveEntry {
            archive: archive.into(),
            entry: entry.into(),
        }
    }

    pub fn nested_archive_entry(
        archive: impl Into<PathBuf>,
        outer: impl Into<String>,
        inner: impl Into<String>,
    ) -> Self {
        Self::NestedArchiveEntry {
            archive: archive.into(),
            outer: outer.into(),
            inner: inner.into(),
        }
    }

    /// The archive path for archive-backed shapes.
    pub fn archive_path(&self) -> Option<&Path> {
        match self {
            Self::File(_) => None,
            Self::ArchiveEntry { archive, .. } | Self::NestedArchiveEntry { archive, .. } => {
                Some(archive)
            }
        }
    }

    /// Human-readable composite label: the location components joined by `:`.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::ArchiveEntry { archive, entry } => {
                format!("{}:{}", archive.display(), entry)
            }
            Self::NestedArchiveEntry {
                archive,
                outer,
                inner,
            } => format!("{}:{}:{}", archive.display(), outer, inner),
        }
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
