//! SubRip timestamps (`HH:MM:SS,mmm`) to and from signed milliseconds.

use std::fmt;

/// Error returned when a timestamp string is not `HH:MM:SS,mmm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimestamp(pub String);

impl fmt::Display for InvalidTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp: {:?}", self.0)
    }
}

impl std::error::Error for InvalidTimestamp {}

/// Format milliseconds as `HH:MM:SS,mmm`. Negative values get a leading `-`.
pub fn format_ms(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let abs = ms.unsigned_abs();
    let total_seconds = abs / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = abs % 1000;

    format!("{sign}{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Parse `HH:MM:SS,mmm` (a `.` before the milliseconds is also accepted).
pub fn parse_ms(timestamp: &str) -> Result<i64, InvalidTimestamp> {
    let invalid = || InvalidTimestamp(timestamp.to_string());
    let trimmed = timestamp.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (hms, millis) = body.split_once([',', '.']).ok_or_else(invalid)?;
    let mut parts = hms.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let number = |part: &str| -> Result<i64, InvalidTimestamp> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<i64>().map_err(|_| invalid())
    };

    let (hours, minutes, seconds) = (number(h)?, number(m)?, number(s)?);
    if minutes >= 60 || seconds >= 60 || millis.len() != 3 {
        return Err(invalid());
    }
    let millis = number(millis)?;
    let ms = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1000 + millis))
        .ok_or_else(invalid)?;

    Ok(if negative { -ms } else { ms })
}
