//! `SxxEyy` episode tags used to match captions to media file names.
//!
//! Two renderings exist. [`EpisodeTagStyle::SeasonEpisode`] renders the
//! caption's season and episode (`S02E07`). [`EpisodeTagStyle::SeasonTwice`]
//! is the legacy lookup, which put the season number in both fields
//! (`S02E02` for season 2 episode 7); it only finds the right file when the
//! season and episode numbers agree.

use serde::Deserialize;

use crate::models::Caption;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EpisodeTagStyle {
    #[default]
    SeasonEpisode,
    SeasonTwice,
}

impl EpisodeTagStyle {
    /// Render the tag for `caption`, zero-padded to two digits per field.
    pub fn format(self, caption: &Caption) -> String {
        let episode = match self {
            EpisodeTagStyle::SeasonEpisode => caption.episode,
            EpisodeTagStyle::SeasonTwice => caption.season,
        };
        format!("S{:02}E{:02}", caption.season, episode)
    }
}

/// True when `file_name` is a candidate for `caption`: it starts with
/// `prefix` and, if the caption carries season/episode numbers, contains the
/// tag rendered with `style`.
pub fn file_matches_caption(
    file_name: &str,
    prefix: &str,
    caption: &Caption,
    style: EpisodeTagStyle,
) -> bool {
    if !file_name.starts_with(prefix) {
        return false;
    }
    if !caption.has_episode_tag() {
        return true;
    }
    file_name.contains(&style.format(caption))
}
