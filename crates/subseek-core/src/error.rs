//! Error taxonomy shared by the store, ingestion, and navigation layers.

use std::path::PathBuf;

/// Result type for subseek core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the caption index and navigation core.
///
/// An unknown search word and an out-of-range seek are not errors: the
/// first yields an empty result, the second resolves to position 0.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Ingestion target is missing or is not a directory.
    #[error("folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// A single subtitle file could not be turned into captions.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// `mark_file_ingested` was called twice for the same file name.
    #[error("file already ingested: {0}")]
    DuplicateFile(String),

    /// `skip_to_index` was given an index outside the marked captions.
    #[error("no such caption index: {index} (marked captions: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Listing or reading the library folder failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persistence backend failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a backend error as [`Error::Storage`].
    ///
    /// Intended for `.map_err(Error::storage)` at storage call sites.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Storage(Box::new(err))
    }

    /// Build an [`Error::Parse`] for `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
