use anyhow::Result;
use serde::Serialize;

use subseek_core::episode::EpisodeTagStyle;
use subseek_core::models::Caption;
use subseek_core::search::search_captions;
use subseek_core::timestamp::format_ms;

use crate::config::Config;

/// A search hit as printed by `subseek search --json`.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub season: i32,
    pub episode: i32,
    pub tag: String,
    pub start: String,
    pub end: String,
    pub text: String,
}

impl SearchHit {
    pub fn new(caption: &Caption, style: EpisodeTagStyle) -> Self {
        Self {
            id: caption.id,
            season: caption.season,
            episode: caption.episode,
            tag: style.format(caption),
            start: format_ms(caption.start_ms),
            end: format_ms(caption.end_ms),
            text: caption.text.clone(),
        }
    }
}

pub async fn run_search(config: &Config, word: &str, limit: Option<i64>, json: bool) -> Result<()> {
    let store = crate::open_store(config).await?;
    let limit = limit.unwrap_or(config.search.default_limit);
    let captions = search_captions(&store, word, limit).await?;
    store.pool().close().await;

    tracing::debug!(word, limit, hits = captions.len(), "search");

    let style = config.library.episode_tag;
    let hits: Vec<SearchHit> = captions
        .iter()
        .map(|c| SearchHit::new(c, style))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{}] {} {} --> {}",
            i + 1,
            hit.id,
            hit.tag,
            hit.start,
            hit.end
        );
        println!("    {}", hit.text);
    }

    Ok(())
}
