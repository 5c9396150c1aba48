//! Finding the library file a caption came from.
//!
//! A caption only remembers its season and episode, so the lookup scans the
//! library folder in name order and returns the first file that starts with
//! the prefix and carries the caption's `SxxEyy` tag. Captions without a tag
//! match the first prefixed file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use subseek_core::episode::{file_matches_caption, EpisodeTagStyle};
use subseek_core::models::Caption;
use subseek_core::parser::CaptionParser;
use subseek_core::store::Store;

use crate::config::Config;
use crate::extensions::SupportedExtensions;
use crate::library::list_files;
use crate::srt::SrtParser;

/// First file in `folder` matching `caption`, any extension.
pub fn resolve_caption_file(
    caption: &Caption,
    prefix: &str,
    folder: &Path,
    style: EpisodeTagStyle,
) -> subseek_core::Result<Option<PathBuf>> {
    resolve_where(caption, prefix, folder, style, |_| true)
}

/// First playable file in `folder` matching `caption`.
pub fn resolve_media_file(
    caption: &Caption,
    prefix: &str,
    folder: &Path,
    style: EpisodeTagStyle,
    extensions: &SupportedExtensions,
) -> subseek_core::Result<Option<PathBuf>> {
    resolve_where(caption, prefix, folder, style, |name| {
        extensions.is_video(name)
    })
}

fn resolve_where(
    caption: &Caption,
    prefix: &str,
    folder: &Path,
    style: EpisodeTagStyle,
    accept: impl Fn(&str) -> bool,
) -> subseek_core::Result<Option<PathBuf>> {
    let found = list_files(folder)?
        .into_iter()
        .find(|f| accept(&f.name) && file_matches_caption(&f.name, prefix, caption, style));

    Ok(found.map(|f| std::fs::canonicalize(&f.path).unwrap_or(f.path)))
}

/// `subseek locate`: print the file a caption belongs to.
pub async fn run_locate(config: &Config, caption_id: i64, media: bool) -> Result<()> {
    let store = crate::open_store(config).await?;
    let caption = store
        .get_caption(caption_id)
        .await?
        .with_context(|| format!("No caption with id {}", caption_id))?;
    store.pool().close().await;

    let library = &config.library;
    let found = if media {
        let extensions = SupportedExtensions::new(
            SrtParser::new().extensions(),
            &library.video_extensions,
        )?;
        resolve_media_file(
            &caption,
            &library.file_prefix,
            &library.folder,
            library.episode_tag,
            &extensions,
        )?
    } else {
        resolve_caption_file(
            &caption,
            &library.file_prefix,
            &library.folder,
            library.episode_tag,
        )?
    };

    match found {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!(
            "No file in {} matches caption {} ({})",
            library.folder.display(),
            caption_id,
            library.episode_tag.format(&caption)
        ),
    }
    Ok(())
}
