use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
const RATE_WINDOW_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TMDB_TOKEN environment variable not set")]
    MissingCredential,
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Run settings, fixed at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_base: String,
    pub min_votes: u32,
    pub min_rating: f64,
    pub start_year: i32,
    pub start_month: u32,
    pub max_pages: u32,
    pub requests_per_window: u32,
    pub window: Duration,
    pub output_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset keys fall back to
    /// their defaults; only the token is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TMDB_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let config = Self {
            token,
            api_base: lookup("TMDB_API_BASE")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            min_votes: parse_or(&lookup, "MIN_VOTES", 1)?,
            min_rating: parse_or(&lookup, "MIN_RATING", 6.0)?,
            start_year: parse_or(&lookup, "START_YEAR", 2024)?,
            start_month: parse_or(&lookup, "START_MONTH", 2)?,
            max_pages: parse_or(&lookup, "MAX_PAGES_PER_TYPE", 500)?,
            requests_per_window: parse_or(&lookup, "REQUESTS_PER_10_SEC", 40)?,
            window: Duration::from_secs(RATE_WINDOW_SECS),
            output_path: lookup("OUTPUT_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data.json")),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=10.0).contains(&self.min_rating) {
            return Err(ConfigError::Invalid {
                key: "MIN_RATING",
                reason: format!("{} is outside 0-10", self.min_rating),
            });
        }
        if self.requests_per_window == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUESTS_PER_10_SEC",
                reason: "must be at least 1".to_string(),
            });
        }
        self.start_date()?;
        Ok(())
    }

    /// First day of the configured start month.
    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::from_ymd_opt(self.start_year, self.start_month, 1).ok_or_else(|| {
            ConfigError::Invalid {
                key: "START_MONTH",
                reason: format!("{}-{} is not a valid month", self.start_year, self.start_month),
            }
        })
    }

    pub fn request_spacing(&self) -> Duration {
        self.window / self.requests_per_window
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}
