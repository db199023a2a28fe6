use std::sync::Arc;

use common::models::StoredPrediction;
use tracing::debug;

use crate::{
    error::StorageError,
    kv_store::{KeyValueStore, read_json, write_json},
};

pub const PREDICTIONS_KEY: &str = "user_predictions";

/// Append-only list of every prediction made on this device, stored as one
/// JSON array.
pub struct PredictionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PredictionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<StoredPrediction>, StorageError> {
        Ok(read_json::<Vec<StoredPrediction>>(self.store.as_ref(), PREDICTIONS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<StoredPrediction>, StorageError> {
        let mut predictions = self.list().await?;
        predictions.retain(|p| p.user_id == user_id);
        Ok(predictions)
    }

    pub async fn append(&self, prediction: StoredPrediction) -> Result<(), StorageError> {
        let mut predictions = self.list().await?;
        debug!(
            "Appending prediction {} on {} ({} stored)",
            prediction.id,
            prediction.prediction.asset.symbol,
            predictions.len()
        );
        predictions.push(prediction);
        write_json(self.store.as_ref(), PREDICTIONS_KEY, &predictions).await
    }
}
