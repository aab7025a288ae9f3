use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::discover::fetch_all_pages;
use crate::enrich::{self, Enrichment};
use crate::models::{
    DiscoveryItem, MediaCategory, Metadata, MovieRecord, OutputDocument, Providers, TvRecord,
};
use crate::rate_limit::RateLimiter;
use crate::tmdb::{DiscoverQuery, TmdbApi};

const PROGRESS_EVERY: usize = 10;

/// Runs discovery and enrichment for movies, then TV, one request at a time.
pub struct Harvester {
    api: Arc<dyn TmdbApi>,
    limiter: RateLimiter,
    config: Config,
}

impl Harvester {
    pub fn new(api: Arc<dyn TmdbApi>, config: Config) -> Self {
        let limiter = RateLimiter::new(config.request_spacing());
        Self {
            api,
            limiter,
            config,
        }
    }

    pub async fn run(&mut self) -> Result<OutputDocument> {
        let start_date = self.config.start_date()?;
        let end_date = Local::now().date_naive();
        info!("Starting TMDB data fetch");
        info!("Date range: {} to {}", start_date, end_date);
        info!(
            "Min rating: {}, Min votes: {}",
            self.config.min_rating, self.config.min_votes
        );

        let movies = self.collect_movies(start_date).await?;
        let tv_shows = self.collect_tv(start_date).await?;

        let metadata = Metadata {
            generated_at: Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: end_date.format("%Y-%m-%d").to_string(),
            start_year: self.config.start_year,
            start_month: self.config.start_month,
            min_votes: self.config.min_votes,
            min_rating: self.config.min_rating,
            total_movies: movies.len(),
            total_tv: tv_shows.len(),
            total_items: movies.len() + tv_shows.len(),
        };

        Ok(OutputDocument {
            movies,
            tv_shows,
            metadata,
        })
    }

    async fn collect_movies(&mut self, start_date: NaiveDate) -> Result<Vec<MovieRecord>> {
        let category = MediaCategory::Movie;
        let discovered = self.discover(category, start_date).await?;

        let mut records = Vec::new();
        for (i, item) in discovered.iter().enumerate() {
            report_progress(category, i, discovered.len());
            let payload =
                enrich::fetch_details(self.api.as_ref(), &mut self.limiter, category, item.id)
                    .await?;
            let enrichment = Enrichment::from_payload(&payload);
            if enrichment.is_excluded() {
                continue;
            }

            records.push(MovieRecord {
                id: item.id,
                title: item.display_title(),
                overview: item.overview.clone(),
                poster_path: item.poster_path.clone(),
                release_date: item.release_date.clone(),
                year: year_of(item.release_date.as_deref()),
                vote_average: item.vote_average,
                vote_count: item.vote_count,
                director: enrich::director(&payload),
                actors: enrichment.actors,
                genres: enrichment.genres,
                providers: Providers {
                    streaming: enrichment.streaming,
                },
                media_type: category,
            });
        }

        info!("Processed {} movies", records.len());
        Ok(records)
    }

    async fn collect_tv(&mut self, start_date: NaiveDate) -> Result<Vec<TvRecord>> {
        let category = MediaCategory::Tv;
        let discovered = self.discover(category, start_date).await?;

        let mut records = Vec::new();
        for (i, item) in discovered.iter().enumerate() {
            report_progress(category, i, discovered.len());
            let payload =
                enrich::fetch_details(self.api.as_ref(), &mut self.limiter, category, item.id)
                    .await?;
            let enrichment = Enrichment::from_payload(&payload);
            if enrichment.is_excluded() {
                continue;
            }

            records.push(TvRecord {
                id: item.id,
                title: item.display_title(),
                overview: item.overview.clone(),
                poster_path: item.poster_path.clone(),
                first_air_date: item.first_air_date.clone(),
                year: year_of(item.first_air_date.as_deref()),
                vote_average: item.vote_average,
                vote_count: item.vote_count,
                actors: enrichment.actors,
                genres: enrichment.genres,
                tv_status: enrich::tv_status(&payload),
                providers: Providers {
                    streaming: enrichment.streaming,
                },
                media_type: category,
            });
        }

        info!("Processed {} TV shows", records.len());
        Ok(records)
    }

    async fn discover(
        &mut self,
        category: MediaCategory,
        start_date: NaiveDate,
    ) -> Result<Vec<DiscoveryItem>> {
        info!("Fetching {}...", category);
        let query = DiscoverQuery::new(category, &self.config, start_date);
        let items = fetch_all_pages(
            self.api.as_ref(),
            &mut self.limiter,
            &query,
            self.config.max_pages,
        )
        .await?;
        info!("Found {} {}", items.len(), category);
        Ok(items)
    }
}

/// Calendar year of a `YYYY-MM-DD` date. Empty or malformed dates have none.
pub fn year_of(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}

fn report_progress(category: MediaCategory, done: usize, total: usize) {
    if done % PROGRESS_EVERY == 0 {
        let pct = if total > 0 { done * 100 / total } else { 0 };
        info!("  {}: {}/{} ({}%)", category, done, total, pct);
    }
}
