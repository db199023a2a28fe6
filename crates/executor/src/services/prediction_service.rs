use std::sync::Arc;

use common::models::{
    Asset, Direction, Prediction, PredictionStats, StoredPrediction, Timeframe, UserProfile,
    short_id,
};
use market_data::traits::{QuoteGateway, quote_for};
use storage::StorageError;
use storage::repositories::{PredictionRepository, SessionError, SessionRepository};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("log in before making predictions")]
    NotLoggedIn,
    #[error("pick a direction")]
    MissingDirection,
    #[error("pick a timeframe")]
    MissingTimeframe,
    #[error("no live price for {0}")]
    PriceUnavailable(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A half-filled prediction form; both choices are required to submit.
#[derive(Debug, Clone)]
pub struct PredictionForm {
    pub asset: Asset,
    pub direction: Option<Direction>,
    pub timeframe: Option<Timeframe>,
}

pub struct PredictionService {
    gateway: Arc<dyn QuoteGateway>,
    session: Arc<SessionRepository>,
    predictions: Arc<PredictionRepository>,
}

impl PredictionService {
    pub fn new(
        gateway: Arc<dyn QuoteGateway>,
        session: Arc<SessionRepository>,
        predictions: Arc<PredictionRepository>,
    ) -> Self {
        Self {
            gateway,
            session,
            predictions,
        }
    }

    pub async fn submit(&self, form: PredictionForm) -> Result<StoredPrediction, PredictionError> {
        let user = self.require_user().await?;
        let direction = form.direction.ok_or(PredictionError::MissingDirection)?;
        let timeframe = form.timeframe.ok_or(PredictionError::MissingTimeframe)?;

        let quote = quote_for(self.gateway.as_ref(), &form.asset)
            .await
            .ok_or_else(|| PredictionError::PriceUnavailable(form.asset.symbol.clone()))?;

        let stored = StoredPrediction {
            prediction: Prediction::pending(form.asset, direction, timeframe, quote.current_price),
            id: short_id(),
            user_id: user.id,
        };

        self.predictions.append(stored.clone()).await?;
        info!(
            "Prediction {} recorded: {} {:?} over {} from {:.2}",
            stored.id,
            stored.prediction.asset.symbol,
            direction,
            timeframe,
            stored.prediction.initial_price
        );
        Ok(stored)
    }

    pub async fn my_predictions(&self) -> Result<Vec<StoredPrediction>, PredictionError> {
        let user = self.require_user().await?;
        Ok(self.predictions.list_for_user(&user.id).await?)
    }

    pub async fn stats(&self) -> Result<PredictionStats, PredictionError> {
        let mine = self.my_predictions().await?;
        Ok(PredictionStats::from_predictions(mine.iter().map(|p| &p.prediction)))
    }

    async fn require_user(&self) -> Result<UserProfile, PredictionError> {
        self.session
            .current_user()
            .await?
            .ok_or(PredictionError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::models::{AssetKind, PredictionStatus, Quote};
    use mockall::mock;
    use storage::{KeyValueStore, MemoryStore};

    mock! {
        Gateway {}

        #[async_trait]
        impl QuoteGateway for Gateway {
            async fn search_assets(&self, query: &str) -> Vec<Asset>;
            async fn equity_quote(&self, symbol: &str) -> Option<Quote>;
            async fn crypto_quote(&self, symbol: &str) -> Option<Quote>;
        }
    }

    fn quote(price: f64) -> Quote {
        Quote {
            current_price: price,
            change: 0.0,
            percent_change: 0.0,
            day_high: price,
            day_low: price,
            day_open: price,
            previous_close: price,
            timestamp: 1_700_000_000,
        }
    }

    struct Fixture {
        service: PredictionService,
        session: Arc<SessionRepository>,
        predictions: Arc<PredictionRepository>,
    }

    fn fixture(gateway: MockGateway) -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionRepository::new(store.clone()));
        let predictions = Arc::new(PredictionRepository::new(store));

        Fixture {
            service: PredictionService::new(
                Arc::new(gateway),
                session.clone(),
                predictions.clone(),
            ),
            session,
            predictions,
        }
    }

    fn form(asset: Asset) -> PredictionForm {
        PredictionForm {
            asset,
            direction: Some(Direction::Up),
            timeframe: Some(Timeframe::SevenDays),
        }
    }

    #[tokio::test]
    async fn test_submit_requires_login() {
        let mut gateway = MockGateway::new();
        gateway.expect_equity_quote().never();
        let f = fixture(gateway);

        let result = f
            .service
            .submit(form(Asset::new("AAPL", "Apple Inc", AssetKind::Stock)))
            .await;

        assert!(matches!(result, Err(PredictionError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_submit_requires_direction_and_timeframe() {
        let mut gateway = MockGateway::new();
        gateway.expect_equity_quote().never();
        let f = fixture(gateway);
        f.session.login("a@b.c").await.unwrap();

        let mut missing_direction = form(Asset::new("AAPL", "Apple Inc", AssetKind::Stock));
        missing_direction.direction = None;
        assert!(matches!(
            f.service.submit(missing_direction).await,
            Err(PredictionError::MissingDirection)
        ));

        let mut missing_timeframe = form(Asset::new("AAPL", "Apple Inc", AssetKind::Stock));
        missing_timeframe.timeframe = None;
        assert!(matches!(
            f.service.submit(missing_timeframe).await,
            Err(PredictionError::MissingTimeframe)
        ));

        assert!(f.predictions.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_stamps_live_crypto_price() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_crypto_quote()
            .withf(|symbol: &str| symbol == "BTC")
            .times(1)
            .returning(|_| Some(quote(43_250.5)));
        let f = fixture(gateway);
        let user = f.session.login("a@b.c").await.unwrap();

        let stored = f
            .service
            .submit(form(Asset::new("BTC", "Bitcoin", AssetKind::Crypto)))
            .await
            .unwrap();

        assert_eq!(stored.user_id, user.id);
        assert_eq!(stored.prediction.asset.symbol, "BTC");
        assert_eq!(stored.prediction.initial_price, 43_250.5);
        assert_eq!(stored.prediction.status, PredictionStatus::Pending);
        assert_eq!(f.predictions.list().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_submit_without_price_is_rejected() {
        let mut gateway = MockGateway::new();
        gateway.expect_equity_quote().returning(|_| None);
        let f = fixture(gateway);
        f.session.login("a@b.c").await.unwrap();

        let result = f
            .service
            .submit(form(Asset::new("ZZZZ", "Nothing", AssetKind::Stock)))
            .await;

        assert!(matches!(result, Err(PredictionError::PriceUnavailable(ref s)) if s == "ZZZZ"));
        assert!(f.predictions.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_only_count_current_user() {
        let mut gateway = MockGateway::new();
        gateway.expect_equity_quote().returning(|_| Some(quote(10.0)));
        let f = fixture(gateway);

        f.session.login("first@example.com").await.unwrap();
        let tsla = Asset::new("TSLA", "Tesla Inc", AssetKind::Stock);
        f.service.submit(form(tsla.clone())).await.unwrap();

        f.session.login("second@example.com").await.unwrap();
        f.service.submit(form(tsla.clone())).await.unwrap();
        f.service.submit(form(tsla)).await.unwrap();

        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(f.predictions.list().await.unwrap().len(), 3);
    }
}
