//! A [`Player`] that narrates commands instead of playing video.
//!
//! `subseek navigate` drives this player so a session can be followed (and
//! scripted) from a terminal. Each command is printed to stdout and the
//! player keeps just enough state to answer the session's queries.

use std::io::Write;
use std::path::{Path, PathBuf};

use subseek_core::navigation::Player;
use subseek_core::timestamp::format_ms;

pub struct ConsolePlayer<W: Write> {
    out: W,
    duration_ms: i64,
    media: Option<PathBuf>,
    position_ms: i64,
    subtitle_offset_ms: i64,
    paused: bool,
}

impl ConsolePlayer<std::io::Stdout> {
    /// Print to stdout. `duration_ms` of `None` means unknown length; seeks
    /// are then never clamped at the end.
    pub fn stdout(duration_ms: Option<i64>) -> Self {
        Self::new(std::io::stdout(), duration_ms)
    }
}

impl<W: Write> ConsolePlayer<W> {
    pub fn new(out: W, duration_ms: Option<i64>) -> Self {
        Self {
            out,
            duration_ms: duration_ms.unwrap_or(i64::MAX),
            media: None,
            position_ms: 0,
            subtitle_offset_ms: 0,
            paused: false,
        }
    }

    pub fn position_ms(&self) -> i64 {
        self.position_ms
    }

    pub fn subtitle_offset_ms(&self) -> i64 {
        self.subtitle_offset_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn say(&mut self, line: std::fmt::Arguments<'_>) {
        tracing::debug!("player: {}", line);
        // A closed stdout only loses narration
        let _ = writeln!(self.out, "player: {}", line);
    }
}

impl<W: Write> Player for ConsolePlayer<W> {
    fn seek(&mut self, time_ms: i64) {
        self.position_ms = time_ms;
        self.say(format_args!("seek {}", format_ms(time_ms)));
    }

    fn set_subtitle_offset(&mut self, offset_ms: i64) {
        self.subtitle_offset_ms = offset_ms;
        self.say(format_args!("subtitle offset {} ms", offset_ms));
    }

    fn total_duration_ms(&self) -> i64 {
        self.duration_ms
    }

    fn currently_loaded_media(&self) -> Option<&Path> {
        self.media.as_deref()
    }

    fn play_media(&mut self, media: &Path) {
        self.media = Some(media.to_path_buf());
        self.position_ms = 0;
        self.paused = false;
        self.say(format_args!("play {}", media.display()));
    }

    fn pause(&mut self) {
        self.paused = !self.paused;
        let state = if self.paused { "paused" } else { "resumed" };
        self.say(format_args!("{}", state));
    }

    fn skip_by(&mut self, delta_ms: i64) {
        self.position_ms = self.position_ms.saturating_add(delta_ms).max(0);
        self.say(format_args!(
            "skip {:+} ms to {}",
            delta_ms,
            format_ms(self.position_ms)
        ));
    }
}
