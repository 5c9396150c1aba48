//! Timestamp-synchronized navigation over a set of marked captions.
//!
//! A [`NavigationSession`] owns the [`Player`] it drives, the list of
//! captions the user is stepping through, and the subtitle delay that
//! compensates for drift between subtitle timing and the audio track.
//!
//! Every seek goes through [`NavigationSession::seek_with_clamp`], which adds
//! the delay and resolves any position outside `[0, duration)` to `0`.
//! Jumping to a caption starts [`LEAD_TIME_MS`] before its nominal start.
//!
//! The session is single-owner state; all operations take `&mut self` and
//! complete synchronously.

use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Caption;

/// Pre-roll subtracted from a caption's start when jumping to it.
pub const LEAD_TIME_MS: i64 = 491;
/// Unit of one smart delay step.
pub const DELAY_STEP_MS: i64 = 100;
/// Largest smart delay multiplier magnitude.
pub const MAX_MULTIPLIER: i32 = 99;

/// Playback capability driven by the navigation controller.
///
/// Media loading and decoding stay on the player's side; the session only
/// issues positioning and subtitle-offset commands.
pub trait Player {
    /// Move playback to an absolute position.
    fn seek(&mut self, time_ms: i64);
    /// Apply a subtitle track offset.
    fn set_subtitle_offset(&mut self, offset_ms: i64);
    /// Length of the loaded media.
    fn total_duration_ms(&self) -> i64;
    fn currently_loaded_media(&self) -> Option<&Path>;
    /// Load and start playing `media`.
    fn play_media(&mut self, media: &Path);
    fn pause(&mut self);
    /// Relative skip from the current position.
    fn skip_by(&mut self, delta_ms: i64);
}

/// Direction for [`NavigationSession::skip_rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

pub struct NavigationSession<P> {
    player: P,
    delay_ms: i64,
    marked: Vec<Caption>,
    current: Option<usize>,
    multiplier: i32,
    /// Whether a smart adjustment has been applied yet; the first one
    /// always starts from a unit step.
    adjusting: bool,
    searched_word: Option<String>,
}

impl<P: Player> NavigationSession<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            delay_ms: 0,
            marked: Vec::new(),
            current: None,
            multiplier: 1,
            adjusting: false,
            searched_word: None,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn into_player(self) -> P {
        self.player
    }

    pub fn delay(&self) -> i64 {
        self.delay_ms
    }

    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    /// Index of the current marked caption; `None` when nothing is marked.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn marked_captions(&self) -> &[Caption] {
        &self.marked
    }

    pub fn current_caption(&self) -> Option<&Caption> {
        self.current.and_then(|i| self.marked.get(i))
    }

    /// Replace the marked captions. The current index resets to `0`, or is
    /// cleared when `captions` is empty.
    pub fn set_marked_captions(&mut self, captions: Vec<Caption>) {
        self.current = if captions.is_empty() { None } else { Some(0) };
        self.marked = captions;
    }

    /// Jump to `caption`, [`LEAD_TIME_MS`] ahead of its start.
    pub fn skip_to_caption(&mut self, caption: &Caption) {
        self.seek_with_clamp(caption.start_ms - LEAD_TIME_MS);
    }

    /// Seek to `time_ms` shifted by the subtitle delay. Positions before the
    /// start or at/after the end of the media resolve to `0`.
    pub fn seek_with_clamp(&mut self, time_ms: i64) {
        let mut target = time_ms.saturating_add(self.delay_ms);
        if target < 0 || target >= self.player.total_duration_ms() {
            target = 0;
        }
        self.player.seek(target);
    }

    /// Step to the next or previous marked caption, wrapping around at
    /// either end. Does nothing when no captions are marked.
    pub fn skip_rotate(&mut self, direction: Direction) -> Option<&Caption> {
        let len = self.marked.len();
        let current = self.current?;
        if len == 0 {
            return None;
        }

        let step = match direction {
            Direction::Forward => 1,
            Direction::Backward => len - 1,
        };
        let next = (current + step) % len;
        self.current = Some(next);

        self.seek_with_clamp(self.marked[next].start_ms - LEAD_TIME_MS);
        self.marked.get(next)
    }

    /// Jump to the marked caption at `index`.
    ///
    /// Fails with [`Error::IndexOutOfRange`] and leaves the session
    /// untouched when `index` is not in `[0, len)`.
    pub fn skip_to_index(&mut self, index: usize) -> Result<&Caption> {
        let len = self.marked.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.current = Some(index);
        self.seek_with_clamp(self.marked[index].start_ms - LEAD_TIME_MS);
        Ok(&self.marked[index])
    }

    /// Set the subtitle delay and re-apply it on the player.
    pub fn set_delay(&mut self, delay_ms: i64) {
        self.delay_ms = delay_ms;
        self.apply_subtitle_offset();
    }

    /// Nudge the delay by an accelerating step.
    ///
    /// Continuing in the same direction doubles the multiplier (capped at
    /// [`MAX_MULTIPLIER`]); reversing resets it to a unit step in the new
    /// direction. The delay then moves by `multiplier * DELAY_STEP_MS`.
    pub fn adjust_delay_smart(&mut self, increase: bool) {
        let continuing = self.adjusting && increase == (self.multiplier > 0);
        self.multiplier = if !continuing {
            if increase {
                1
            } else {
                -1
            }
        } else if self.multiplier.abs() < MAX_MULTIPLIER {
            (self.multiplier * 2).clamp(-MAX_MULTIPLIER, MAX_MULTIPLIER)
        } else {
            self.multiplier
        };
        self.adjusting = true;

        self.delay_ms = self
            .delay_ms
            .saturating_add(i64::from(self.multiplier) * DELAY_STEP_MS);
        self.apply_subtitle_offset();
    }

    /// Load `media` and start at `start_ms` shifted by the delay. The
    /// subtitle offset is re-applied when a delay is in effect.
    pub fn start_playing(&mut self, media: &Path, start_ms: i64) {
        self.player.play_media(media);
        self.player.seek(start_ms.saturating_add(self.delay_ms));
        if self.delay_ms != 0 {
            self.apply_subtitle_offset();
        }
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn skip_by(&mut self, delta_ms: i64) {
        self.player.skip_by(delta_ms);
    }

    pub fn set_searched_word(&mut self, word: impl Into<String>) {
        self.searched_word = Some(word.into());
    }

    pub fn searched_word(&self) -> Option<&str> {
        self.searched_word.as_deref()
    }

    /// Title for a playback window: `"word" in file.mkv - subseek`.
    pub fn window_title(&self, media: &Path) -> String {
        let file_name = media
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| media.display().to_string());
        format!(
            "\"{}\" in {} - subseek",
            self.searched_word.as_deref().unwrap_or_default(),
            file_name
        )
    }

    fn apply_subtitle_offset(&mut self) {
        self.player.set_subtitle_offset(self.delay_ms);
    }
}
