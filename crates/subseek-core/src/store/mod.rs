//! Storage abstraction for the caption index.
//!
//! The [`Store`] trait covers the three persistent pieces of subseek: the
//! caption store, the word index, and the file dedup registry. Backends are
//! pluggable (SQLite in the application crate, [`memory::InMemoryStore`]
//! here).
//!
//! Implementations must be `Send + Sync` to work with async runtimes, and
//! must serialize [`index_file`](Store::index_file) calls against each other.
//! Reads may run concurrently with an in-flight `index_file` and observe the
//! index either before or after that file.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Caption, IndexCounts, NewCaption, TokenizedCaption};

/// Outcome of indexing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIndexOutcome {
    /// The file was new; its captions and links are now stored.
    Indexed { captions: usize },
    /// The registry already had the file; nothing was written.
    AlreadyIngested,
}

/// Abstract storage backend for the caption index.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert_caption`](Store::insert_caption) | Store a caption, assign its id |
/// | [`ensure_word`](Store::ensure_word) | Get or create a word id |
/// | [`link_word_to_caption`](Store::link_word_to_caption) | Insert-or-ignore a word→caption link |
/// | [`is_file_ingested`](Store::is_file_ingested) | Dedup registry lookup |
/// | [`mark_file_ingested`](Store::mark_file_ingested) | Dedup registry insert |
/// | [`index_file`](Store::index_file) | All of the above for one file, atomically |
/// | [`word_id`](Store::word_id) | Look up a normalized word |
/// | [`captions_for_word`](Store::captions_for_word) | Linked captions, ascending id |
/// | [`get_caption`](Store::get_caption) | One caption by id |
/// | [`counts`](Store::counts) | Row counts |
#[async_trait]
pub trait Store: Send + Sync {
    /// Store a caption and return its freshly assigned id.
    async fn insert_caption(&self, caption: &NewCaption) -> Result<i64>;

    /// Return the id of `word`, creating it on first sight.
    async fn ensure_word(&self, word: &str) -> Result<i64>;

    /// Record that `caption_id` contains `word_id`. Duplicates are ignored.
    async fn link_word_to_caption(&self, word_id: i64, caption_id: i64) -> Result<()>;

    /// True if `file_name` was already ingested.
    async fn is_file_ingested(&self, file_name: &str) -> Result<bool>;

    /// Register `file_name` as ingested.
    ///
    /// Fails with [`Error::DuplicateFile`](crate::Error::DuplicateFile) if it
    /// is already registered; callers check
    /// [`is_file_ingested`](Store::is_file_ingested) first.
    async fn mark_file_ingested(&self, file_name: &str) -> Result<()>;

    /// Index one parsed file as a single unit: insert every caption, ensure
    /// and link each of its words, then mark the file ingested.
    ///
    /// Either all of it becomes visible or none of it does. If the file is
    /// already registered, nothing is written.
    async fn index_file(
        &self,
        file_name: &str,
        captions: &[TokenizedCaption],
    ) -> Result<FileIndexOutcome>;

    /// Look up the id of an already normalized word.
    async fn word_id(&self, word: &str) -> Result<Option<i64>>;

    /// Captions linked to `word_id`, ascending by caption id, at most `limit`.
    async fn captions_for_word(&self, word_id: i64, limit: usize) -> Result<Vec<Caption>>;

    /// Retrieve a caption by id.
    async fn get_caption(&self, id: i64) -> Result<Option<Caption>>;

    /// Row counts across words, captions, links, and files.
    async fn counts(&self) -> Result<IndexCounts>;
}
