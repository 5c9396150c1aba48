//! File extensions subseek knows how to handle.
//!
//! Built once at startup from the parser's subtitle formats and the
//! configured video formats; immutable afterwards.

use anyhow::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

#[derive(Debug, Clone)]
pub struct SupportedExtensions {
    subtitles: Vec<String>,
    videos: Vec<String>,
    subtitle_set: GlobSet,
    video_set: GlobSet,
}

impl SupportedExtensions {
    /// An empty `subtitles` list means the parser accepts any file.
    pub fn new<S: AsRef<str>, V: AsRef<str>>(subtitles: &[S], videos: &[V]) -> Result<Self> {
        let subtitles: Vec<String> = subtitles.iter().map(|s| normalize(s.as_ref())).collect();
        let videos: Vec<String> = videos.iter().map(|s| normalize(s.as_ref())).collect();
        Ok(Self {
            subtitle_set: build_globset(&subtitles)?,
            video_set: build_globset(&videos)?,
            subtitles,
            videos,
        })
    }

    pub fn subtitles(&self) -> &[String] {
        &self.subtitles
    }

    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    /// Subtitle extensions followed by video extensions.
    pub fn media(&self) -> Vec<&str> {
        self.subtitles
            .iter()
            .chain(self.videos.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_subtitle(&self, file_name: &str) -> bool {
        self.subtitles.is_empty() || self.subtitle_set.is_match(file_name)
    }

    pub fn is_video(&self, file_name: &str) -> bool {
        self.video_set.is_match(file_name)
    }
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

fn build_globset(extensions: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        builder.add(
            GlobBuilder::new(&format!("*.{}", ext))
                .case_insensitive(true)
                .literal_separator(true)
                .build()?,
        );
    }
    Ok(builder.build()?)
}
