//! In-memory [`Store`] implementation for tests and embedding.
//!
//! All tables live behind one `std::sync::RwLock`, so `index_file` is atomic
//! and serialized with respect to every other write.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Caption, IndexCounts, NewCaption, TokenizedCaption};

use super::{FileIndexOutcome, Store};

#[derive(Default)]
struct Tables {
    words: HashMap<String, i64>,
    next_word_id: i64,
    captions: BTreeMap<i64, Caption>,
    next_caption_id: i64,
    /// `(word_id, caption_id)`; ordered so a word's captions come out by id.
    links: BTreeSet<(i64, i64)>,
    files: HashMap<String, i64>,
    next_file_id: i64,
}

impl Tables {
    fn insert_caption(&mut self, caption: &NewCaption) -> i64 {
        self.next_caption_id += 1;
        let id = self.next_caption_id;
        self.captions.insert(id, caption.clone().into_caption(id));
        id
    }

    fn ensure_word(&mut self, word: &str) -> i64 {
        if let Some(&id) = self.words.get(word) {
            return id;
        }
        self.next_word_id += 1;
        self.words.insert(word.to_string(), self.next_word_id);
        self.next_word_id
    }

    fn mark_file(&mut self, file_name: &str) -> Result<()> {
        if self.files.contains_key(file_name) {
            return Err(Error::DuplicateFile(file_name.to_string()));
        }
        self.next_file_id += 1;
        self.files.insert(file_name.to_string(), self.next_file_id);
        Ok(())
    }
}

/// In-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::storage(std::io::Error::other("in-memory store lock poisoned"))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_caption(&self, caption: &NewCaption) -> Result<i64> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        Ok(tables.insert_caption(caption))
    }

    async fn ensure_word(&self, word: &str) -> Result<i64> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        Ok(tables.ensure_word(word))
    }

    async fn link_word_to_caption(&self, word_id: i64, caption_id: i64) -> Result<()> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables.links.insert((word_id, caption_id));
        Ok(())
    }

    async fn is_file_ingested(&self, file_name: &str) -> Result<bool> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.files.contains_key(file_name))
    }

    async fn mark_file_ingested(&self, file_name: &str) -> Result<()> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables.mark_file(file_name)
    }

    async fn index_file(
        &self,
        file_name: &str,
        captions: &[TokenizedCaption],
    ) -> Result<FileIndexOutcome> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        if tables.files.contains_key(file_name) {
            return Ok(FileIndexOutcome::AlreadyIngested);
        }

        for tokenized in captions {
            let caption_id = tables.insert_caption(&tokenized.caption);
            for word in &tokenized.words {
                let word_id = tables.ensure_word(word);
                tables.links.insert((word_id, caption_id));
            }
        }
        tables.mark_file(file_name)?;

        Ok(FileIndexOutcome::Indexed {
            captions: captions.len(),
        })
    }

    async fn word_id(&self, word: &str) -> Result<Option<i64>> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.words.get(word).copied())
    }

    async fn captions_for_word(&self, word_id: i64, limit: usize) -> Result<Vec<Caption>> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables
            .links
            .range((word_id, i64::MIN)..=(word_id, i64::MAX))
            .filter_map(|(_, caption_id)| tables.captions.get(caption_id).cloned())
            .take(limit)
            .collect())
    }

    async fn get_caption(&self, id: i64) -> Result<Option<Caption>> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(tables.captions.get(&id).cloned())
    }

    async fn counts(&self) -> Result<IndexCounts> {
        let tables = self.tables.read().map_err(poisoned)?;
        Ok(IndexCounts {
            words: tables.words.len() as i64,
            captions: tables.captions.len() as i64,
            links: tables.links.len() as i64,
            files: tables.files.len() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_SEASON;

    fn new_caption(text: &str) -> NewCaption {
        NewCaption {
            season: NO_SEASON,
            episode: 1,
            start_ms: 1_000,
            end_ms: 2_000,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_word_is_idempotent() {
        let store = InMemoryStore::new();
        let a = store.ensure_word("lazarus").await.unwrap();
        let b = store.ensure_word("lazarus").await.unwrap();
        let c = store.ensure_word("larry").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.counts().await.unwrap().words, 2);
    }

    #[tokio::test]
    async fn test_duplicate_link_is_ignored() {
        let store = InMemoryStore::new();
        let caption_id = store.insert_caption(&new_caption("hi")).await.unwrap();
        let word_id = store.ensure_word("hi").await.unwrap();
        store.link_word_to_caption(word_id, caption_id).await.unwrap();
        store.link_word_to_caption(word_id, caption_id).await.unwrap();
        assert_eq!(store.counts().await.unwrap().links, 1);
    }

    #[tokio::test]
    async fn test_mark_file_twice_fails() {
        let store = InMemoryStore::new();
        assert!(!store.is_file_ingested("a.srt").await.unwrap());
        store.mark_file_ingested("a.srt").await.unwrap();
        assert!(store.is_file_ingested("a.srt").await.unwrap());

        let err = store.mark_file_ingested("a.srt").await.unwrap_err();
        assert!(matches!(err, Error::DuplicateFile(name) if name == "a.srt"));
    }

    #[tokio::test]
    async fn test_index_file_skips_registered_file() {
        let store = InMemoryStore::new();
        let batch = vec![TokenizedCaption {
            caption: new_caption("pretty good"),
            words: vec!["pretty".to_string(), "good".to_string()],
        }];

        let first = store.index_file("a.srt", &batch).await.unwrap();
        assert_eq!(first, FileIndexOutcome::Indexed { captions: 1 });
        let before = store.counts().await.unwrap();

        let second = store.index_file("a.srt", &batch).await.unwrap();
        assert_eq!(second, FileIndexOutcome::AlreadyIngested);
        assert_eq!(store.counts().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_captions_for_word_ascending_and_limited() {
        let store = InMemoryStore::new();
        let word_id = store.ensure_word("x").await.unwrap();
        let mut ids = Vec::new();
        for text in ["one", "two", "three"] {
            ids.push(store.insert_caption(&new_caption(text)).await.unwrap());
        }
        for id in ids.iter().rev() {
            store.link_word_to_caption(word_id, *id).await.unwrap();
        }

        let found = store.captions_for_word(word_id, 2).await.unwrap();
        let found_ids: Vec<i64> = found.iter().map(|c| c.id).collect();
        assert_eq!(found_ids, vec![ids[0], ids[1]]);
    }
}
