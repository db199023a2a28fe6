pub mod asset;
pub mod prediction;
pub mod quote;
pub mod user;

pub use asset::{Asset, AssetKind, popular_assets};
pub use prediction::{
    Direction, ParseEnumError, PopularPrediction, Prediction, PredictionStats, PredictionStatus,
    StoredPrediction, Timeframe, popular_predictions,
};
pub use quote::Quote;
pub use user::{UserProfile, short_id};
