use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::models::{DetailPayload, DiscoverPage, MediaCategory};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

/// Raw TMDB reads used by the harvest. Rate limiting happens in the callers.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn discover_page(&self, query: &DiscoverQuery, page: u32) -> Result<DiscoverPage>;
    async fn fetch_details(&self, category: MediaCategory, id: i64) -> Result<DetailPayload>;
}

/// Filters for one `/discover` listing, sorted by descending popularity.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub category: MediaCategory,
    pub start_date: NaiveDate,
    pub min_votes: u32,
    pub min_rating: f64,
}

impl DiscoverQuery {
    pub fn new(category: MediaCategory, config: &Config, start_date: NaiveDate) -> Self {
        Self {
            category,
            start_date,
            min_votes: config.min_votes,
            min_rating: config.min_rating,
        }
    }

    pub fn url(&self, api_base: &str) -> String {
        format!(
            "{api_base}/discover/{}?sort_by=popularity.desc&{}={}&vote_count.gte={}&vote_average.gte={}",
            self.category.as_path(),
            self.category.date_filter(),
            self.start_date.format("%Y-%m-%d"),
            self.min_votes,
            self.min_rating,
        )
    }

    pub fn page_url(&self, api_base: &str, page: u32) -> String {
        format!("{}&page={}", self.url(api_base), page)
    }
}

pub fn detail_url(api_base: &str, category: MediaCategory, id: i64) -> String {
    format!(
        "{api_base}/{}/{id}?append_to_response=credits,watch/providers",
        category.as_path()
    )
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_base: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("TMDB token is not a valid header value")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = format!("cinefeed/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let res = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> HTTP {}: {}", url, status, text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {}", url))?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn discover_page(&self, query: &DiscoverQuery, page: u32) -> Result<DiscoverPage> {
        self.get_json(&query.page_url(&self.api_base, page)).await
    }

    async fn fetch_details(&self, category: MediaCategory, id: i64) -> Result<DetailPayload> {
        self.get_json(&detail_url(&self.api_base, category, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(category: MediaCategory) -> DiscoverQuery {
        DiscoverQuery {
            category,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            min_votes: 1,
            min_rating: 6.0,
        }
    }

    #[test]
    fn movie_discover_url_filters_on_primary_release_date() {
        let url = query(MediaCategory::Movie).page_url("https://api.themoviedb.org/3", 3);
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc\
             &primary_release_date.gte=2024-02-01&vote_count.gte=1&vote_average.gte=6&page=3"
        );
    }

    #[test]
    fn tv_discover_url_filters_on_first_air_date() {
        let mut q = query(MediaCategory::Tv);
        q.min_rating = 7.5;
        let url = q.url("http://localhost/3");
        assert!(url.starts_with("http://localhost/3/discover/tv?sort_by=popularity.desc"));
        assert!(url.contains("&first_air_date.gte=2024-02-01"));
        assert!(url.ends_with("&vote_average.gte=7.5"));
    }

    #[test]
    fn detail_url_appends_credits_and_providers() {
        assert_eq!(
            detail_url("http://localhost/3", MediaCategory::Tv, 42),
            "http://localhost/3/tv/42?append_to_response=credits,watch/providers"
        );
    }

    #[test]
    fn builds_client_from_config() {
        let config =
            Config::from_lookup(|k| (k == "TMDB_TOKEN").then(|| "secret".to_string())).unwrap();
        let client = TmdbClient::new(&config).unwrap();
        assert_eq!(client.api_base, crate::config::DEFAULT_API_BASE);
    }
}
