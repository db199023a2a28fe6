use common::models::Quote;
use serde::Deserialize;

use crate::{error::GatewayError, traits::RemoteResponse};

#[derive(Deserialize, Debug)]
pub struct QuoteResponse {
    #[serde(rename(deserialize = "c"))]
    pub current_price: Option<f64>,
    #[serde(rename(deserialize = "d"))]
    pub change: Option<f64>,
    #[serde(rename(deserialize = "dp"))]
    pub percent_change: Option<f64>,
    #[serde(rename(deserialize = "h"))]
    pub high: Option<f64>,
    #[serde(rename(deserialize = "l"))]
    pub low: Option<f64>,
    #[serde(rename(deserialize = "o"))]
    pub open: Option<f64>,
    #[serde(rename(deserialize = "pc"))]
    pub previous_close: Option<f64>,
    #[serde(rename(deserialize = "t"))]
    pub timestamp: Option<i64>,
}

impl RemoteResponse<Quote> for QuoteResponse {
    // Upstream answers unknown symbols with an all-zero body, so a zero
    // price is treated the same as a missing one.
    fn to_model(&self, symbol: &str) -> Result<Quote, GatewayError> {
        let current_price = match self.current_price {
            Some(price) if price != 0.0 => price,
            _ => return Err(GatewayError::NoData(symbol.to_string())),
        };

        Ok(Quote {
            current_price,
            change: self.change.unwrap_or(0_f64),
            percent_change: self.percent_change.unwrap_or(0_f64),
            day_high: self.high.unwrap_or(0_f64),
            day_low: self.low.unwrap_or(0_f64),
            day_open: self.open.unwrap_or(0_f64),
            previous_close: self.previous_close.unwrap_or(0_f64),
            timestamp: self.timestamp.unwrap_or(0),
        })
    }
}
