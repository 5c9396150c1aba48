//! Interactive navigation over search results (`subseek navigate`).
//!
//! Reads one command per line and applies it to a [`NavigationSession`]:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `n`, `next` | Next caption, wrapping to the first |
//! | `p`, `prev` | Previous caption, wrapping to the last |
//! | `g N`, `goto N` | Caption number `N` (as shown by `l`) |
//! | `+`, `-` | Smart delay adjustment |
//! | `d MS`, `delay MS` | Set the delay |
//! | `s MS`, `skip MS` | Relative skip |
//! | `o`, `open` | Play the current caption's media file |
//! | `pause` | Toggle pause |
//! | `l`, `list` | List the captions |
//! | `q`, `quit` | Leave (end of input does too) |

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use subseek_core::models::Caption;
use subseek_core::navigation::{Direction, NavigationSession, Player, LEAD_TIME_MS};
use subseek_core::parser::CaptionParser;
use subseek_core::search::search_captions;
use subseek_core::timestamp::{format_ms, parse_ms};

use crate::config::Config;
use crate::extensions::SupportedExtensions;
use crate::player::ConsolePlayer;
use crate::resolve::resolve_media_file;
use crate::srt::SrtParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Goto(usize),
    Increase,
    Decrease,
    SetDelay(i64),
    Skip(i64),
    Open,
    Pause,
    List,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments: {}", line.trim()));
        }

        let number = |what: &str| -> Result<i64, String> {
            arg.ok_or_else(|| format!("{} needs a number", what))?
                .parse::<i64>()
                .map_err(|_| format!("not a number: {}", arg.unwrap_or_default()))
        };

        let command = match head {
            "n" | "next" => Command::Next,
            "p" | "prev" => Command::Prev,
            "g" | "goto" => {
                let n = number(head)?;
                Command::Goto(usize::try_from(n).map_err(|_| format!("no caption {}", n))?)
            }
            "+" => Command::Increase,
            "-" => Command::Decrease,
            "d" | "delay" => Command::SetDelay(number(head)?),
            "s" | "skip" => Command::Skip(number(head)?),
            "o" | "open" => Command::Open,
            "pause" => Command::Pause,
            "l" | "list" => Command::List,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };

        let takes_arg = matches!(
            command,
            Command::Goto(_) | Command::SetDelay(_) | Command::Skip(_)
        );
        if arg.is_some() && !takes_arg {
            return Err(format!("{} takes no argument", head));
        }
        Ok(command)
    }
}

const HELP: &str = "commands: n, p, g N, +, -, d MS, s MS, o, pause, l, q";

/// Finds the playable file for a caption.
pub type MediaLookup<'a> = dyn Fn(&Caption) -> Result<Option<PathBuf>> + 'a;

fn caption_line(number: usize, caption: &Caption, tag: &str) -> String {
    format!(
        "{:>3}. [{}] {} {} --> {}  {}",
        number,
        caption.id,
        tag,
        format_ms(caption.start_ms),
        format_ms(caption.end_ms),
        caption.text
    )
}

/// Drive `session` with commands read from `input` until `q` or end of input.
///
/// Command errors are reported on `out` and the session carries on.
pub fn drive_session<P, R, W>(
    session: &mut NavigationSession<P>,
    input: R,
    out: &mut W,
    tag: &dyn Fn(&Caption) -> String,
    media_lookup: &MediaLookup<'_>,
) -> Result<()>
where
    P: Player,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "error: {}", message)?;
                continue;
            }
        };
        tracing::debug!(?command, "navigate");

        match command {
            Command::Quit => break,
            Command::Next | Command::Prev => {
                let direction = if command == Command::Next {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                session.skip_rotate(direction);
                print_current(session, out, tag)?;
            }
            Command::Goto(number) => {
                let len = session.marked_captions().len();
                let moved = number
                    .checked_sub(1)
                    .is_some_and(|i| session.skip_to_index(i).is_ok());
                if moved {
                    print_current(session, out, tag)?;
                } else {
                    writeln!(
                        out,
                        "error: no caption {} (captions are numbered 1 to {})",
                        number, len
                    )?;
                }
            }
            Command::Increase | Command::Decrease => {
                session.adjust_delay_smart(command == Command::Increase);
                writeln!(
                    out,
                    "delay: {} ms (step x{})",
                    session.delay(),
                    session.multiplier()
                )?;
            }
            Command::SetDelay(ms) => {
                session.set_delay(ms);
                writeln!(out, "delay: {} ms", session.delay())?;
            }
            Command::Skip(ms) => session.skip_by(ms),
            Command::Pause => session.pause(),
            Command::Open => {
                let Some(caption) = session.current_caption().cloned() else {
                    writeln!(out, "error: nothing to open")?;
                    continue;
                };
                match media_lookup(&caption) {
                    Ok(Some(media)) => {
                        session.start_playing(&media, caption.start_ms - LEAD_TIME_MS);
                        writeln!(out, "{}", session.window_title(&media))?;
                    }
                    Ok(None) => writeln!(out, "error: no media file for {}", tag(&caption))?,
                    Err(e) => writeln!(out, "error: {:#}", e)?,
                }
            }
            Command::List => {
                for (i, caption) in session.marked_captions().iter().enumerate() {
                    let marker = if session.current_index() == Some(i) {
                        "*"
                    } else {
                        " "
                    };
                    writeln!(
                        out,
                        "{}{}",
                        marker,
                        caption_line(i + 1, caption, &tag(caption))
                    )?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
        }
    }
    Ok(())
}

fn print_current<P: Player, W: Write>(
    session: &NavigationSession<P>,
    out: &mut W,
    tag: &dyn Fn(&Caption) -> String,
) -> Result<()> {
    if let (Some(i), Some(caption)) = (session.current_index(), session.current_caption()) {
        writeln!(out, "{}", caption_line(i + 1, caption, &tag(caption)))?;
    }
    Ok(())
}

/// `subseek navigate`: search for `word` and navigate the hits from stdin.
pub async fn run_navigate(
    config: &Config,
    word: &str,
    limit: Option<i64>,
    delay: Option<i64>,
    duration: Option<String>,
) -> Result<()> {
    let duration_ms = duration
        .map(|d| parse_ms(&d).with_context(|| format!("Invalid --duration '{}'", d)))
        .transpose()?;

    let store = crate::open_store(config).await?;
    let limit = limit.unwrap_or(config.search.default_limit);
    let captions = search_captions(&store, word, limit).await?;
    store.pool().close().await;

    if captions.is_empty() {
        println!("No results.");
        return Ok(());
    }
    tracing::info!(word, hits = captions.len(), "navigating");

    let library = config.library.clone();
    let extensions =
        SupportedExtensions::new(SrtParser::new().extensions(), &library.video_extensions)?;
    let style = library.episode_tag;
    let tag = move |caption: &Caption| style.format(caption);
    let media_lookup = move |caption: &Caption| -> Result<Option<PathBuf>> {
        Ok(resolve_media_file(
            caption,
            &library.file_prefix,
            &library.folder,
            library.episode_tag,
            &extensions,
        )?)
    };

    let mut session = NavigationSession::new(ConsolePlayer::stdout(duration_ms));
    session.set_searched_word(word);
    session.set_marked_captions(captions);
    if let Some(delay) = delay {
        session.set_delay(delay);
    }

    let mut stdout = std::io::stdout();
    writeln!(
        stdout,
        "{} captions for \"{}\". {}",
        session.marked_captions().len(),
        word,
        HELP
    )?;
    print_current(&session, &mut stdout, &tag)?;

    let stdin = std::io::stdin();
    drive_session(&mut session, stdin.lock(), &mut stdout, &tag, &media_lookup)
}
