//! # subseek core
//!
//! Runtime-agnostic logic for subseek: caption models, the error taxonomy,
//! word tokenization, SubRip timestamps, episode tags, the [`store::Store`]
//! abstraction with an in-memory backend, the word query algorithm, the
//! caption parser interface, and the playback navigation controller.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Backends that
//! need them live in the `subseek` application crate.

pub mod episode;
pub mod error;
pub mod models;
pub mod navigation;
pub mod parser;
pub mod search;
pub mod store;
pub mod timestamp;
pub mod tokenize;

pub use error::{Error, Result};
pub use models::{Caption, NewCaption, TokenizedCaption};
