use anyhow::{Context, Result};

use crate::models::{
    DetailPayload, EpisodeSummary, EpisodeToAir, MediaCategory, StreamingProvider, TvStatus,
};
use crate::rate_limit::RateLimiter;
use crate::tmdb::{TmdbApi, IMAGE_BASE};

pub const NOT_AVAILABLE: &str = "N/A";
pub const PROVIDER_REGION: &str = "US";
pub const EXCLUDED_GENRES: [&str; 5] = ["Animation", "Music", "Documentary", "Kids", "Reality"];

const TOP_CAST: usize = 3;

/// Fields pulled out of a detail payload that both categories share.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub actors: String,
    pub genres: String,
    pub genre_names: Vec<String>,
    pub streaming: Vec<StreamingProvider>,
}

impl Enrichment {
    pub fn from_payload(payload: &DetailPayload) -> Self {
        let genre_names = genre_names(payload);
        Self {
            actors: top_cast(payload),
            genres: join_or_sentinel(&genre_names),
            genre_names,
            streaming: streaming_providers(payload),
        }
    }

    pub fn is_excluded(&self) -> bool {
        is_excluded_genre(&self.genre_names)
    }
}

pub async fn fetch_details(
    api: &dyn TmdbApi,
    limiter: &mut RateLimiter,
    category: MediaCategory,
    id: i64,
) -> Result<DetailPayload> {
    limiter.acquire().await;
    api.fetch_details(category, id)
        .await
        .with_context(|| format!("fetching {} details for {} failed", category.as_path(), id))
}

pub fn director(payload: &DetailPayload) -> String {
    payload
        .credits
        .as_ref()
        .and_then(|c| c.crew.as_ref())
        .and_then(|crew| crew.iter().find(|m| m.job.as_deref() == Some("Director")))
        .map(|m| m.name.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn top_cast(payload: &DetailPayload) -> String {
    let names: Vec<String> = payload
        .credits
        .as_ref()
        .and_then(|c| c.cast.as_ref())
        .map(|cast| cast.iter().take(TOP_CAST).map(|m| m.name.clone()).collect())
        .unwrap_or_default();
    join_or_sentinel(&names)
}

pub fn genre_names(payload: &DetailPayload) -> Vec<String> {
    payload
        .genres
        .as_ref()
        .map(|g| g.iter().map(|x| x.name.clone()).collect())
        .unwrap_or_default()
}

pub fn streaming_providers(payload: &DetailPayload) -> Vec<StreamingProvider> {
    payload
        .watch_providers
        .as_ref()
        .and_then(|w| w.results.get(PROVIDER_REGION))
        .and_then(|region| region.flatrate.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|p| StreamingProvider {
                    name: p.provider_name.clone(),
                    logo_url: p.logo_path.as_ref().map(|path| format!("{IMAGE_BASE}{path}")),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn tv_status(payload: &DetailPayload) -> TvStatus {
    TvStatus {
        status: payload
            .status
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        in_production: payload.in_production.unwrap_or(false),
        last_episode: payload.last_episode_to_air.as_ref().map(episode_summary),
        next_episode: payload.next_episode_to_air.as_ref().map(episode_summary),
    }
}

pub fn is_excluded_genre<S: AsRef<str>>(genres: &[S]) -> bool {
    genres
        .iter()
        .any(|g| EXCLUDED_GENRES.contains(&g.as_ref()))
}

fn episode_summary(ep: &EpisodeToAir) -> EpisodeSummary {
    EpisodeSummary {
        season: ep.season_number,
        episode: ep.episode_number,
        air_date: ep.air_date.clone(),
        name: ep.name.clone(),
    }
}

fn join_or_sentinel(names: &[String]) -> String {
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(", ")
    }
}
