//! # subseek
//!
//! A word index over a library of subtitle files, and a navigator that jumps
//! a media player between the captions containing a word.
//!
//! subseek ingests SubRip files from a folder, splits every caption into
//! normalized words, and stores captions and the word → caption index in
//! SQLite. A search returns every caption containing a word, oldest first;
//! `subseek navigate` then steps through those hits and seeks the player to
//! each one, with an adjustable subtitle delay.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Library dir │──▶│  Ingestion  │──▶│    SQLite     │
//! │  *.srt      │   │ parse+index │   │ words/captions│
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                            │
//!                        ┌───────────────────┤
//!                        ▼                   ▼
//!                  ┌──────────┐       ┌────────────┐
//!                  │  search  │──────▶│  navigate  │──▶ player
//!                  └──────────┘       └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! subseek init                  # create database
//! subseek ingest                # index the configured library
//! subseek search lazarus
//! subseek navigate lazarus      # n / p / g N / + / - / o / q
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite [`Store`] backend |
//! | [`srt`] | SubRip parser |
//! | [`library`] | Library folder listing |
//! | [`extensions`] | Supported subtitle and video extensions |
//! | [`ingest`] | Ingestion coordinator |
//! | [`resolve`] | Caption → library file lookup |
//! | [`search`] | `subseek search` |
//! | [`navigate`] | `subseek navigate` |
//! | [`player`] | Console player |
//! | [`stats`] | `subseek stats` |
//!
//! Runtime-independent pieces (models, tokenization, the [`Store`] trait,
//! the query algorithm, and the navigation controller) live in
//! [`subseek_core`].

pub mod config;
pub mod db;
pub mod extensions;
pub mod ingest;
pub mod library;
pub mod migrate;
pub mod navigate;
pub mod player;
pub mod resolve;
pub mod search;
pub mod sqlite_store;
pub mod srt;
pub mod stats;

pub use subseek_core::store::Store;
pub use subseek_core::{Caption, Error, NewCaption};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Connect to the configured database, make sure the schema exists, and
/// wrap the pool in a [`SqliteStore`].
pub async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;
    Ok(SqliteStore::new(pool))
}
