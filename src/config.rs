//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/subseek.sqlite"
//!
//! [library]
//! folder = "/media/curb"
//! file_prefix = "Curb Your Enthusiasm"
//! episode_tag = "season-episode"   # or "season-twice"
//! video_extensions = ["mkv", "mp4", "avi"]
//!
//! [search]
//! default_limit = 20
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use subseek_core::episode::EpisodeTagStyle;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub library: LibraryConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    /// Folder holding subtitle and media files.
    pub folder: PathBuf,
    /// Only files whose name starts with this prefix are considered.
    #[serde(default)]
    pub file_prefix: String,
    #[serde(default)]
    pub episode_tag: EpisodeTagStyle,
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

fn default_video_extensions() -> Vec<String> {
    ["mkv", "mp4", "avi", "mov", "m4v", "webm", "wmv", "mpg", "mpeg"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> i64 {
    20
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.default_limit < 1 {
        anyhow::bail!("search.default_limit must be >= 1");
    }

    for ext in &config.library.video_extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\', '*']) {
            anyhow::bail!(
                "library.video_extensions entries must be bare extensions like \"mkv\", got '{}'",
                ext
            );
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(body: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("subseek.toml");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let (_tmp, path) = write_config(
            r#"
[db]
path = "data/subseek.sqlite"

[library]
folder = "subs"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.library.file_prefix, "");
        assert_eq!(config.library.episode_tag, EpisodeTagStyle::SeasonEpisode);
        assert!(config.library.video_extensions.contains(&"mkv".to_string()));
    }

    #[test]
    fn test_legacy_episode_tag() {
        let (_tmp, path) = write_config(
            r#"
[db]
path = "db.sqlite"

[library]
folder = "subs"
episode_tag = "season-twice"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.library.episode_tag, EpisodeTagStyle::SeasonTwice);
    }

    #[test]
    fn test_rejects_zero_limit() {
        let (_tmp, path) = write_config(
            r#"
[db]
path = "db.sqlite"

[library]
folder = "subs"

[search]
default_limit = 0
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("default_limit"));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let (_tmp, path) = write_config(
            r#"
[db]
path = "db.sqlite"

[library]
folder = "subs"
video_extensions = [".mkv"]
"#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/subseek.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_example_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/subseek.example.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.library.file_prefix, "Curb Your Enthusiasm");
        assert_eq!(config.library.video_extensions, vec!["mkv", "mp4", "avi"]);
    }
}
