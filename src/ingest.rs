//! Ingestion coordinator.
//!
//! Walks a library folder, picks the files whose name starts with the
//! configured prefix, and feeds each new one through the parser into the
//! store:
//!
//! ```text
//! list folder → prefix filter → dedup check → parse → tokenize → index_file
//! ```
//!
//! Each file is written as one unit via [`Store::index_file`], so a failure
//! partway through a file never leaves it half-indexed or marked. Files
//! completed earlier in the run stay ingested.
//!
//! A file that fails to parse is logged, recorded in the report, and skipped;
//! it is not marked, so the next run retries it. Storage failures abort the
//! run.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use subseek_core::error::Error;
use subseek_core::models::TokenizedCaption;
use subseek_core::parser::CaptionParser;
use subseek_core::store::{FileIndexOutcome, Store};
use subseek_core::tokenize::distinct_words;

use crate::config::Config;
use crate::extensions::SupportedExtensions;
use crate::library::list_candidates;
use crate::srt::SrtParser;

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub folder: PathBuf,
    /// Files whose name starts with the prefix.
    pub candidates: usize,
    /// Candidates skipped because the registry already had them.
    pub already_ingested: usize,
    /// Candidates the parser has no support for.
    pub unsupported: usize,
    pub files_ingested: usize,
    pub captions_written: usize,
    pub failures: Vec<IngestFailure>,
}

/// A candidate that could not be parsed.
#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    pub file_name: String,
    pub error: String,
}

/// Ingest every new candidate in `folder` whose name starts with `prefix`.
pub async fn ingest_folder(
    store: &dyn Store,
    parser: &dyn CaptionParser,
    extensions: &SupportedExtensions,
    folder: &Path,
    prefix: &str,
) -> subseek_core::Result<IngestReport> {
    let candidates = list_candidates(folder, prefix)?;
    tracing::info!(
        folder = %folder.display(),
        prefix,
        candidates = candidates.len(),
        "scanning library"
    );

    let mut report = IngestReport {
        folder: folder.to_path_buf(),
        candidates: candidates.len(),
        ..Default::default()
    };

    for file in candidates {
        if store.is_file_ingested(&file.name).await? {
            tracing::debug!(file = %file.name, "already ingested");
            report.already_ingested += 1;
            continue;
        }
        if !extensions.is_subtitle(&file.name) {
            tracing::debug!(file = %file.name, "not a supported subtitle format");
            report.unsupported += 1;
            continue;
        }

        let captions = match parser.parse(&file.path) {
            Ok(captions) => captions,
            Err(e @ Error::Parse { .. }) => {
                tracing::warn!(file = %file.name, error = %e, "skipping file");
                report.failures.push(IngestFailure {
                    file_name: file.name,
                    error: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let tokenized: Vec<TokenizedCaption> = captions
            .into_iter()
            .map(|caption| TokenizedCaption {
                words: distinct_words(&caption.text),
                caption,
            })
            .collect();

        match store.index_file(&file.name, &tokenized).await? {
            FileIndexOutcome::Indexed { captions } => {
                tracing::info!(file = %file.name, captions, "ingested");
                report.files_ingested += 1;
                report.captions_written += captions;
            }
            FileIndexOutcome::AlreadyIngested => {
                report.already_ingested += 1;
            }
        }
    }

    Ok(report)
}

/// `subseek ingest`: open the store and ingest the configured library.
pub async fn run_ingest(
    config: &Config,
    folder: Option<PathBuf>,
    prefix: Option<String>,
) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.library.folder.clone());
    let prefix = prefix.unwrap_or_else(|| config.library.file_prefix.clone());

    let store = crate::open_store(config).await?;
    let parser = SrtParser::new();
    let extensions =
        SupportedExtensions::new(parser.extensions(), &config.library.video_extensions)?;

    let report = ingest_folder(&store, &parser, &extensions, &folder, &prefix).await?;

    println!("ingest {}", report.folder.display());
    println!("  candidates: {}", report.candidates);
    println!("  already ingested: {}", report.already_ingested);
    if report.unsupported > 0 {
        println!("  unsupported: {}", report.unsupported);
    }
    println!("  files ingested: {}", report.files_ingested);
    println!("  captions written: {}", report.captions_written);
    for failure in &report.failures {
        println!("  warning: {}: {}", failure.file_name, failure.error);
    }
    println!("ok");

    store.pool().close().await;
    Ok(())
}
