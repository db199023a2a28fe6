use std::collections::HashMap;
use std::sync::Arc;

use common::models::{Asset, PopularPrediction, Quote};
use futures_util::future::join_all;
use tracing::{debug, info};

use crate::traits::{QuoteGateway, quote_for};

#[derive(Debug, Clone, PartialEq)]
pub struct PricedPrediction {
    pub prediction: PopularPrediction,
    pub current_price: Option<f64>,
}

impl PricedPrediction {
    pub fn symbol(&self) -> &str {
        &self.prediction.asset.symbol
    }
}

/// Live prices for the home board. Crypto seeds go through the venue pair
/// but are always reported under their own symbol.
pub struct PriceBoard {
    gateway: Arc<dyn QuoteGateway>,
}

impl PriceBoard {
    pub fn new(gateway: Arc<dyn QuoteGateway>) -> Self {
        Self { gateway }
    }

    pub async fn refresh(&self, seeds: &[PopularPrediction]) -> Vec<PricedPrediction> {
        let quotes = join_all(
            seeds
                .iter()
                .map(|seed| quote_for(self.gateway.as_ref(), &seed.asset)),
        )
        .await;

        let board: Vec<PricedPrediction> = seeds
            .iter()
            .cloned()
            .zip(quotes)
            .map(|(prediction, quote)| PricedPrediction {
                prediction,
                current_price: quote.map(|q| q.current_price),
            })
            .collect();

        let priced = board.iter().filter(|p| p.current_price.is_some()).count();
        info!("Price board refreshed: {}/{} priced", priced, board.len());
        board
    }

    /// Quotes keyed by the asset's own symbol.
    pub async fn quotes(&self, assets: &[Asset]) -> HashMap<String, Option<Quote>> {
        let quotes = join_all(
            assets
                .iter()
                .map(|asset| quote_for(self.gateway.as_ref(), asset)),
        )
        .await;

        assets
            .iter()
            .zip(quotes)
            .map(|(asset, quote)| {
                debug!("{} -> {:?}", asset.symbol, quote.as_ref().map(|q| q.current_price));
                (asset.symbol.clone(), quote)
            })
            .collect()
    }
}
