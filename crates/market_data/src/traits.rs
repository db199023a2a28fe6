use async_trait::async_trait;
use common::models::{Asset, Quote};

use crate::error::GatewayError;

pub trait RemoteResponse<T> {
    /// `requested` is the symbol or query the response was fetched for.
    fn to_model(&self, requested: &str) -> Result<T, GatewayError>;
}

/// Remote symbol search and quotes. Every failure is absorbed: searches
/// degrade to an empty list and quotes to `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteGateway: Send + Sync {
    async fn search_assets(&self, query: &str) -> Vec<Asset>;

    async fn equity_quote(&self, symbol: &str) -> Option<Quote>;

    /// `symbol` is the bare coin ticker (e.g. `BTC`), which the gateway
    /// rewrites to the venue pair, or a pair already qualified by venue.
    async fn crypto_quote(&self, symbol: &str) -> Option<Quote>;
}

/// Routes on the asset kind, always with the asset's own symbol.
pub async fn quote_for(gateway: &dyn QuoteGateway, asset: &Asset) -> Option<Quote> {
    if asset.is_crypto() {
        gateway.crypto_quote(&asset.symbol).await
    } else {
        gateway.equity_quote(&asset.symbol).await
    }
}
