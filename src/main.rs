//! # subseek CLI
//!
//! ## Usage
//!
//! ```bash
//! subseek --config ./config/subseek.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `subseek init` | Create the SQLite database and schema |
//! | `subseek ingest` | Index new subtitle files from the library folder |
//! | `subseek search <word>` | List captions containing a word |
//! | `subseek locate <id>` | Print the library file a caption belongs to |
//! | `subseek stats` | Show index counts |
//! | `subseek navigate <word>` | Step a player through the captions of a word |
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default
//! `subseek=info`). Command output goes to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use subseek::{config, ingest, migrate, navigate, resolve, search, stats};

/// subseek: find every caption that says a word, then jump a player to it.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/subseek.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "subseek",
    about = "Word index over subtitle files with caption-to-caption navigation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/subseek.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the words, captions,
    /// words_to_captions, and files_seen tables. Safe to run repeatedly.
    Init,

    /// Ingest new subtitle files from the library folder.
    ///
    /// Files already recorded as ingested are skipped; files that fail to
    /// parse are reported and retried on the next run.
    Ingest {
        /// Folder to scan instead of `[library].folder`.
        #[arg(long)]
        folder: Option<PathBuf>,

        /// File name prefix instead of `[library].file_prefix`.
        #[arg(long)]
        prefix: Option<String>,
    },

    /// List captions containing a word, oldest first.
    Search {
        word: String,

        /// Maximum number of captions to return.
        #[arg(long)]
        limit: Option<i64>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the library file a caption was ingested from.
    Locate {
        caption_id: i64,

        /// Look for a playable video file instead of any matching file.
        #[arg(long)]
        media: bool,
    },

    /// Show word, caption, link, and file counts.
    Stats,

    /// Navigate the captions containing a word from an interactive prompt.
    ///
    /// Commands are read from stdin, one per line; `help` lists them.
    Navigate {
        word: String,

        /// Maximum number of captions to navigate.
        #[arg(long)]
        limit: Option<i64>,

        /// Initial subtitle delay in milliseconds.
        #[arg(long, allow_hyphen_values = true)]
        delay: Option<i64>,

        /// Media duration (`HH:MM:SS,mmm`); seeks past it go to the start.
        #[arg(long)]
        duration: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "subseek=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest { folder, prefix } => {
            ingest::run_ingest(&cfg, folder, prefix).await?;
        }
        Commands::Search { word, limit, json } => {
            search::run_search(&cfg, &word, limit, json).await?;
        }
        Commands::Locate { caption_id, media } => {
            resolve::run_locate(&cfg, caption_id, media).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Navigate {
            word,
            limit,
            delay,
            duration,
        } => {
            navigate::run_navigate(&cfg, &word, limit, delay, duration).await?;
        }
    }

    Ok(())
}
