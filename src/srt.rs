//! SubRip (`.srt`) caption parser.
//!
//! A file is a sequence of blank-line separated blocks:
//!
//! ```text
//! 12
//! 00:01:02,345 --> 00:01:04,000
//! <i>Pretty, pretty,</i>
//! pretty good.
//! ```
//!
//! The index line is optional. Text lines are joined with a space and
//! stripped of formatting markup. Season and episode numbers come from an
//! `SxxEyy` tag in the file name; files without one get the sentinels.

use regex::Regex;
use std::path::Path;

use subseek_core::error::{Error, Result};
use subseek_core::models::{NewCaption, NO_EPISODE, NO_SEASON};
use subseek_core::parser::CaptionParser;
use subseek_core::timestamp::parse_ms;
use subseek_core::tokenize::strip_markup;

pub struct SrtParser {
    episode_tag: Regex,
}

impl SrtParser {
    pub fn new() -> Self {
        Self {
            episode_tag: Regex::new(r"(?i)S(\d{1,3})E(\d{1,3})").expect("Invalid regex"),
        }
    }

    /// `(season, episode)` from an `SxxEyy` tag in `file_name`.
    pub fn episode_from_file_name(&self, file_name: &str) -> (i32, i32) {
        self.episode_tag
            .captures(file_name)
            .and_then(|caps| {
                let season = caps.get(1)?.as_str().parse().ok()?;
                let episode = caps.get(2)?.as_str().parse().ok()?;
                Some((season, episode))
            })
            .unwrap_or((NO_SEASON, NO_EPISODE))
    }

    /// Parse SubRip `content`, tagging every caption with the given numbers.
    pub fn parse_str(
        &self,
        content: &str,
        season: i32,
        episode: i32,
    ) -> std::result::Result<Vec<NewCaption>, String> {
        let content = content.trim_start_matches('\u{feff}');
        let mut captions = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in content.lines().chain(std::iter::once("")) {
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                block.push(line);
                continue;
            }
            if block.is_empty() {
                continue;
            }
            if let Some(caption) = parse_block(&block, season, episode)? {
                captions.push(caption);
            }
            block.clear();
        }

        Ok(captions)
    }
}

impl Default for SrtParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_block(
    block: &[&str],
    season: i32,
    episode: i32,
) -> std::result::Result<Option<NewCaption>, String> {
    let timing_at = block
        .iter()
        .position(|line| line.contains("-->"))
        .ok_or_else(|| format!("caption block without a timing line: {:?}", block[0]))?;

    let (start, end) = block[timing_at]
        .split_once("-->")
        .ok_or_else(|| format!("malformed timing line: {:?}", block[timing_at]))?;
    // Anything after the end timestamp is positioning, e.g. `X1:100 X2:200`
    let end = end.split_whitespace().next().unwrap_or_default();
    let start_ms = parse_ms(start).map_err(|e| e.to_string())?;
    let end_ms = parse_ms(end).map_err(|e| e.to_string())?;

    let text = block[timing_at + 1..]
        .iter()
        .map(|line| strip_markup(line))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(NewCaption {
        season,
        episode,
        start_ms,
        end_ms,
        text,
    }))
}

impl CaptionParser for SrtParser {
    fn parse(&self, path: &Path) -> Result<Vec<NewCaption>> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::parse(path, e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let (season, episode) = self.episode_from_file_name(&file_name);

        self.parse_str(&content, season, episode)
            .map_err(|message| Error::parse(path, message))
    }

    fn extensions(&self) -> &[&'static str] {
        &["srt"]
    }
}
