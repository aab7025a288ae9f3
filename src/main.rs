use anyhow::Result;
use chrono::Local;
use cinefeed::config::Config;
use cinefeed::output::write_document;
use cinefeed::pipeline::Harvester;
use cinefeed::tmdb::{TmdbApi, TmdbClient};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_result = dotenv();
    init_tracing();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let config = Config::from_env()?;
    let output_path = config.output_path.clone();
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);

    let doc = Harvester::new(tmdb, config).run().await?;
    let size = write_document(&output_path, &doc).await?;

    info!("{}", "=".repeat(50));
    info!("SUCCESS");
    info!("Movies: {}", doc.metadata.total_movies);
    info!("TV Shows: {}", doc.metadata.total_tv);
    info!("Total: {}", doc.metadata.total_items);
    info!("Saved to: {}", output_path.display());
    info!("File size: {:.2} MB", size as f64 / 1024.0 / 1024.0);
    info!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(50));
    Ok(())
}
