use anyhow::{Context, Result};
use tracing::info;

use crate::models::DiscoveryItem;
use crate::rate_limit::RateLimiter;
use crate::tmdb::{DiscoverQuery, TmdbApi};

/// Walks `/discover` pages `1..=min(total_pages, max_pages)` and collects every
/// result in listing order.
///
/// The page count is unknown until the first response, so the loop starts by
/// assuming a single page. A page without `results` adds nothing and leaves the
/// known bound in place. Any request error ends the walk.
pub async fn fetch_all_pages(
    api: &dyn TmdbApi,
    limiter: &mut RateLimiter,
    query: &DiscoverQuery,
    max_pages: u32,
) -> Result<Vec<DiscoveryItem>> {
    let mut items = Vec::new();
    let mut page = 1u32;
    let mut total_pages = 1u32;

    while page <= total_pages.min(max_pages) {
        info!("  Fetching page {}/{}...", page, total_pages.min(max_pages));
        limiter.acquire().await;
        let response = api
            .discover_page(query, page)
            .await
            .with_context(|| format!("discover {} page {} failed", query.category, page))?;

        if let Some(results) = response.results {
            items.extend(results);
            total_pages = response.total_pages.unwrap_or(1);
        }
        page += 1;
    }

    Ok(items)
}
