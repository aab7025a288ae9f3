//! Fetch one TMDB detail payload and print the fields the harvest extracts.
//! Usage:
//!   cargo run --bin detail_probe -- movie <tmdb_id>
//!   cargo run --bin detail_probe -- tv <tmdb_id>
//! Requires TMDB_TOKEN in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use cinefeed::config::Config;
use cinefeed::enrich::{self, Enrichment};
use cinefeed::models::MediaCategory;
use cinefeed::rate_limit::RateLimiter;
use cinefeed::tmdb::TmdbClient;
use dotenvy::dotenv;
use serde_json::json;
use std::env;

fn parse_category(raw: &str) -> Result<MediaCategory> {
    match raw.to_lowercase().as_str() {
        "movie" => Ok(MediaCategory::Movie),
        "tv" => Ok(MediaCategory::Tv),
        _ => Err(anyhow!("media kind must be 'movie' or 'tv'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let category = parse_category(&args.next().context("missing media kind")?)?;
    let id: i64 = args
        .next()
        .context("missing TMDB id")?
        .parse()
        .context("TMDB id must be numeric")?;

    let config = Config::from_env()?;
    let client = TmdbClient::new(&config)?;
    let mut limiter = RateLimiter::new(config.request_spacing());
    let payload = enrich::fetch_details(&client, &mut limiter, category, id).await?;
    let enrichment = Enrichment::from_payload(&payload);
    let excluded = enrichment.is_excluded();

    let mut out = json!({
        "id": id,
        "type": category,
        "actors": enrichment.actors,
        "genres": enrichment.genres,
        "excluded": excluded,
        "streaming": enrichment.streaming,
    });
    match category {
        MediaCategory::Movie => out["director"] = json!(enrich::director(&payload)),
        MediaCategory::Tv => out["tv_status"] = json!(enrich::tv_status(&payload)),
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
