//! Word lookup over the caption index.
//!
//! The query algorithm operates entirely through the [`Store`] trait:
//!
//! 1. Normalize the search term exactly as ingestion normalizes caption text.
//! 2. Resolve the word id; an unknown word is an empty result, not an error.
//! 3. Load the linked captions in ascending caption id (insertion order).
//! 4. Truncate to `limit`. A `limit <= 0` yields nothing.
//!
//! There is no relevance ranking.

use crate::error::Result;
use crate::models::Caption;
use crate::store::Store;
use crate::tokenize::normalize_word;

/// Captions containing `word`, oldest first, at most `limit` of them.
pub async fn search_captions(store: &dyn Store, word: &str, limit: i64) -> Result<Vec<Caption>> {
    if limit <= 0 {
        return Ok(Vec::new());
    }
    let Some(normalized) = normalize_word(word) else {
        return Ok(Vec::new());
    };
    let Some(word_id) = store.word_id(&normalized).await? else {
        return Ok(Vec::new());
    };

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    store.captions_for_word(word_id, limit).await
}
