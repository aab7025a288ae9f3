pub mod config;
pub mod discover;
pub mod enrich;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod rate_limit;
pub mod tmdb;
