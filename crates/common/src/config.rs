use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: Url,
    pub debounce: Duration,
    pub max_results: usize,
    pub crypto_venue: String,
    pub crypto_quote: String,
    pub db_path: String,
}

impl AppConfig {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: Url::parse(base_url)?,
            debounce: Duration::from_millis(300),
            max_results: 10,
            crypto_venue: "BINANCE".to_string(),
            crypto_quote: "USDT".to_string(),
            db_path: "trend.db".to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            env::var("FINNHUB_API_KEY").map_err(|_| ConfigError::Missing("FINNHUB_API_KEY"))?;
        let base_url =
            env::var("FINNHUB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(&api_key, &base_url)?;

        if let Some(ms) = parse_var::<u64>("TREND_DEBOUNCE_MS")? {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(max) = parse_var::<usize>("TREND_MAX_RESULTS")? {
            config.max_results = max;
        }
        if let Ok(venue) = env::var("TREND_CRYPTO_VENUE") {
            config.crypto_venue = venue;
        }
        if let Ok(quote) = env::var("TREND_CRYPTO_QUOTE") {
            config.crypto_quote = quote;
        }
        if let Ok(path) = env::var("TREND_DB_PATH") {
            config.db_path = path;
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}
