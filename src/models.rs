use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Movie,
    Tv,
}

impl MediaCategory {
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaCategory::Movie => "movie",
            MediaCategory::Tv => "tv",
        }
    }

    /// Discovery filter key for the earliest release or first-air date.
    pub fn date_filter(&self) -> &'static str {
        match self {
            MediaCategory::Movie => "primary_release_date.gte",
            MediaCategory::Tv => "first_air_date.gte",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaCategory::Movie => f.write_str("Movies"),
            MediaCategory::Tv => f.write_str("TV Shows"),
        }
    }
}

/// One page of `/discover/{movie|tv}`.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverPage {
    pub results: Option<Vec<DiscoveryItem>>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryItem {
    pub id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

impl DiscoveryItem {
    /// Movies carry `title`, shows carry `name`.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/{movie|tv}/{id}?append_to_response=credits,watch/providers`.
///
/// Every sub-object is optional; absent pieces degrade to sentinels during
/// extraction instead of failing the item.
#[derive(Debug, Default, Deserialize)]
pub struct DetailPayload {
    pub credits: Option<Credits>,
    #[serde(rename = "watch/providers")]
    pub watch_providers: Option<WatchProviders>,
    pub genres: Option<Vec<Genre>>,
    pub status: Option<String>,
    pub in_production: Option<bool>,
    pub last_episode_to_air: Option<EpisodeToAir>,
    pub next_episode_to_air: Option<EpisodeToAir>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Credits {
    pub cast: Option<Vec<CastMember>>,
    pub crew: Option<Vec<CrewMember>>,
}

#[derive(Debug, Deserialize)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CrewMember {
    pub job: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionProviders {
    pub flatrate: Option<Vec<ProviderEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderEntry {
    pub provider_name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeToAir {
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub air_date: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamingProvider {
    pub name: String,
    #[serde(rename = "logo")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Providers {
    pub streaming: Vec<StreamingProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub air_date: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvStatus {
    pub status: String,
    pub in_production: bool,
    pub last_episode: Option<EpisodeSummary>,
    pub next_episode: Option<EpisodeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub director: String,
    pub actors: String,
    pub genres: String,
    pub providers: Providers,
    #[serde(rename = "type")]
    pub media_type: MediaCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct TvRecord {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub first_air_date: Option<String>,
    pub year: Option<i32>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub actors: String,
    pub genres: String,
    pub tv_status: TvStatus,
    pub providers: Providers,
    #[serde(rename = "type")]
    pub media_type: MediaCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub generated_at: String,
    pub start_date: String,
    pub end_date: String,
    pub start_year: i32,
    pub start_month: u32,
    pub min_votes: u32,
    pub min_rating: f64,
    pub total_movies: usize,
    pub total_tv: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    pub movies: Vec<MovieRecord>,
    pub tv_shows: Vec<TvRecord>,
    pub metadata: Metadata,
}
