use reqwest::StatusCode;
use thiserror::Error;

/// Why a gateway call produced nothing. Only ever logged; callers see an
/// empty list or `None`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no price data for {0}")]
    NoData(String),
}
