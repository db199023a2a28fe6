use async_trait::async_trait;
use common::config::AppConfig;
use common::models::{Asset, Quote};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    error::GatewayError,
    remote::{CryptoSymbolFormat, QuoteResponse, SearchResponse},
    traits::{QuoteGateway, RemoteResponse},
};

/// Finnhub-compatible REST client. One GET per call: no caching, no retry,
/// and no timeout beyond the reqwest default.
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
    api_key: String,
    crypto: CryptoSymbolFormat,
}

impl FinnhubClient {
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().user_agent("trend/0.1.0").build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &AppConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            crypto: CryptoSymbolFormat::new(&config.crypto_venue, &config.crypto_quote),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str::<T>(&body)?)
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<Asset>, GatewayError> {
        let response: SearchResponse = self.get_json("search", &[("q", query)]).await?;
        debug!("Search {:?} returned {} hits", query, response.count);
        response.to_model(query)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, GatewayError> {
        let response: QuoteResponse = self.get_json("quote", &[("symbol", symbol)]).await?;
        response.to_model(symbol)
    }
}

#[async_trait]
impl QuoteGateway for FinnhubClient {
    async fn search_assets(&self, query: &str) -> Vec<Asset> {
        match self.fetch_search(query).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!("Asset search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn equity_quote(&self, symbol: &str) -> Option<Quote> {
        debug!("Fetching quote for {}", symbol);
        self.fetch_quote(symbol)
            .await
            .map_err(|e| warn!("Quote for {} unavailable: {}", symbol, e))
            .ok()
    }

    async fn crypto_quote(&self, symbol: &str) -> Option<Quote> {
        let pair = self.crypto.rewrite(symbol);
        debug!("Fetching crypto quote for {} as {}", symbol, pair);
        self.fetch_quote(&pair)
            .await
            .map_err(|e| warn!("Crypto quote for {} unavailable: {}", pair, e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::quote_for;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers exactly one request and hands back its request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn client_for(base_url: &str) -> FinnhubClient {
        let config = AppConfig::new("test-key", base_url).unwrap();
        let http = Client::builder().no_proxy().build().unwrap();
        FinnhubClient::with_client(&config, http)
    }

    #[tokio::test]
    async fn test_search_sends_query_and_token() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"count":1,"result":[{"description":"APPLE INC","displaySymbol":"AAPL","symbol":"AAPL","type":"Common Stock"}]}"#,
        )
        .await;

        let assets = client_for(&base).search_assets("apple inc").await;
        let request_line = server.await.unwrap();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].symbol, "AAPL");
        assert!(request_line.starts_with("GET /search?"));
        assert!(request_line.contains("q=apple+inc"));
        assert!(request_line.contains("token=test-key"));
    }

    #[tokio::test]
    async fn test_crypto_quote_requests_rewritten_symbol() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"c":43250.5,"d":120.0,"dp":0.28,"h":43500.0,"l":42900.0,"o":43100.0,"pc":43130.5,"t":1700000000}"#,
        )
        .await;

        let quote = client_for(&base).crypto_quote("BTC").await;
        let request_line = server.await.unwrap();

        assert_eq!(quote.map(|q| q.current_price), Some(43_250.5));
        assert!(request_line.starts_with("GET /quote?"));
        assert!(request_line.contains("symbol=BINANCE%3ABTCUSDT"));
    }

    #[tokio::test]
    async fn test_crypto_search_hit_is_quoted_by_its_own_pair() {
        let search: SearchResponse = serde_json::from_str(
            r#"{"count":1,"result":[{"description":"Binance BTCUSDT","displaySymbol":"BTC/USDT","symbol":"BINANCE:BTCUSDT","type":"Crypto"}]}"#,
        )
        .unwrap();
        let hits = search.to_model("btc").unwrap();
        assert!(hits[0].is_crypto());

        let (base, server) = serve_once(
            "200 OK",
            r#"{"c":43250.5,"d":120.0,"dp":0.28,"h":43500.0,"l":42900.0,"o":43100.0,"pc":43130.5,"t":1700000000}"#,
        )
        .await;

        let quote = quote_for(&client_for(&base), &hits[0]).await;
        let request_line = server.await.unwrap();

        assert_eq!(quote.map(|q| q.current_price), Some(43_250.5));
        assert!(request_line.contains("symbol=BINANCE%3ABTCUSDT&"));
    }

    #[tokio::test]
    async fn test_zero_price_quote_is_absent() {
        let (base, server) =
            serve_once("200 OK", r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#)
                .await;

        let quote = client_for(&base).equity_quote("NOPE").await;
        server.await.unwrap();

        assert_eq!(quote, None);
    }

    #[tokio::test]
    async fn test_error_status_is_absorbed() {
        let (base, server) = serve_once("429 Too Many Requests", r#"{"error":"limit"}"#).await;

        let assets = client_for(&base).search_assets("aapl").await;
        server.await.unwrap();

        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_absorbed() {
        let (base, server) = serve_once("200 OK", "not json").await;

        let quote = client_for(&base).equity_quote("AAPL").await;
        server.await.unwrap();

        assert_eq!(quote, None);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_absorbed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}", addr));

        assert!(client.search_assets("aapl").await.is_empty());
        assert_eq!(client.equity_quote("AAPL").await, None);
        assert_eq!(client.crypto_quote("BTC").await, None);
    }
}
