use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Separator between an archive path and an entry name in the composite
/// key string form.
pub const ARCHIVE_SEPARATOR: char = '!';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("resource key is empty")]
    EmptyPath,
    #[error("archive key '{0}' has an empty entry name")]
    EmptyEntry(String),
}

/// Normalized location of a cacheable resource. The string form is stable
/// across repeated resolutions of the same logical resource and doubles as
/// the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// A plain file on the filesystem.
    File(PathBuf),
    /// A member of a zip archive, addressed as `<archive>!<entry>`.
    ArchiveEntry { archive: PathBuf, entry: String },
}

impl ResourceKey {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(normalize_path(path.as_ref()))
    }

    pub fn archive_entry(archive: impl AsRef<Path>, entry: impl Into<String>) -> Self {
        Self::ArchiveEntry {
            archive: normalize_path(archive.as_ref()),
            entry: normalize_entry(&entry.into()),
        }
    }

    /// The containing file on disk: the file itself, or the archive the
    /// entry lives in.
    pub fn container(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::ArchiveEntry { archive, .. } => archive,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::ArchiveEntry { archive, entry } => {
                write!(f, "{}{}{}", archive.display(), ARCHIVE_SEPARATOR, entry)
            }
        }
    }
}

impl FromStr for ResourceKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyError::EmptyPath);
        }

        match s.split_once(ARCHIVE_SEPARATOR) {
            Some((_, entry)) if entry.is_empty() => Err(KeyError::EmptyEntry(s.to_owned())),
            Some((archive, entry)) => Ok(Self::archive_entry(archive, entry)),
            None => Ok(Self::file(s)),
        }
    }
}

/// Lexically folds `.` and `..` components so equivalent spellings of one
/// path land on one cache key. Does not touch the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn normalize_entry(entry: &str) -> String {
    let entry = entry.replace('\\', "/");
    entry.trim_start_matches('/').to_owned()
}
