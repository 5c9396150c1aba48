//! Core data models for the caption index.
//!
//! Captions flow from the parser as [`NewCaption`]s, are tokenized into
//! [`TokenizedCaption`]s by the ingestion coordinator, and come back out of
//! the store as [`Caption`]s carrying their assigned id.

use serde::Serialize;

/// Season value for captions whose source file carries no season tag.
pub const NO_SEASON: i32 = -1;
/// Episode value for captions whose source file carries no episode tag.
pub const NO_EPISODE: i32 = -1;

/// A stored caption: one timed subtitle line. Immutable after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    /// Assigned by the store on insert; ascending in insertion order.
    pub id: i64,
    pub season: i32,
    pub episode: i32,
    /// Start offset in milliseconds.
    pub start_ms: i64,
    /// End offset in milliseconds.
    pub end_ms: i64,
    pub text: String,
}

impl Caption {
    /// True unless both season and episode are the sentinel values.
    pub fn has_episode_tag(&self) -> bool {
        !(self.season == NO_SEASON && self.episode == NO_EPISODE)
    }
}

/// A caption as produced by a parser, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCaption {
    pub season: i32,
    pub episode: i32,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

impl NewCaption {
    pub fn into_caption(self, id: i64) -> Caption {
        Caption {
            id,
            season: self.season,
            episode: self.episode,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            text: self.text,
        }
    }
}

/// A parsed caption paired with the distinct normalized words of its text.
#[derive(Debug, Clone)]
pub struct TokenizedCaption {
    pub caption: NewCaption,
    pub words: Vec<String>,
}

/// Row counts across the index tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexCounts {
    pub words: i64,
    pub captions: i64,
    pub links: i64,
    pub files: i64,
}
