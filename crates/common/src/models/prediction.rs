use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::asset::{Asset, AssetKind};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ParseEnumError {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "7d" => Ok(Self::SevenDays),
            "30d" => Ok(Self::ThirtyDays),
            _ => Err(ParseEnumError {
                kind: "timeframe",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Correct,
    Incorrect,
}

/// A directional bet. Nothing ever moves a prediction out of `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub asset: Asset,
    pub direction: Direction,
    pub timeframe: Timeframe,
    pub initial_price: f64,
    pub created_at: DateTime<Utc>,
    pub status: PredictionStatus,
}

impl Prediction {
    pub fn pending(asset: Asset, direction: Direction, timeframe: Timeframe, price: f64) -> Self {
        Self {
            asset,
            direction,
            timeframe,
            initial_price: price,
            created_at: Utc::now(),
            status: PredictionStatus::Pending,
        }
    }
}

/// Shape appended to the local prediction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrediction {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub pending: usize,
    /// Percentage of resolved predictions that were correct.
    pub accuracy: f64,
}

impl PredictionStats {
    pub fn from_predictions<'a, I>(predictions: I) -> Self
    where
        I: IntoIterator<Item = &'a Prediction>,
    {
        let mut stats = Self::default();
        for prediction in predictions {
            stats.total += 1;
            match prediction.status {
                PredictionStatus::Pending => stats.pending += 1,
                PredictionStatus::Correct => stats.correct += 1,
                PredictionStatus::Incorrect => stats.incorrect += 1,
            }
        }

        let resolved = stats.correct + stats.incorrect;
        if resolved > 0 {
            stats.accuracy = stats.correct as f64 / resolved as f64 * 100.0;
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopularPrediction {
    pub asset: Asset,
    pub direction: Direction,
    pub timeframe: Timeframe,
    pub count: u32,
}

pub fn popular_predictions() -> Vec<PopularPrediction> {
    use Direction::*;
    use Timeframe::*;

    let seeds = [
        ("BTC", "Bitcoin", AssetKind::Crypto, Up, SevenDays, 89),
        ("AAPL", "Apple Inc", AssetKind::Stock, Up, OneDay, 67),
        ("TSLA", "Tesla Inc", AssetKind::Stock, Down, ThirtyDays, 45),
        ("ETH", "Ethereum", AssetKind::Crypto, Up, SevenDays, 72),
        ("NVDA", "NVIDIA Corporation", AssetKind::Stock, Up, OneDay, 58),
        ("GOOGL", "Alphabet Inc", AssetKind::Stock, Down, SevenDays, 41),
    ];

    seeds
        .into_iter()
        .map(
            |(symbol, description, kind, direction, timeframe, count)| PopularPrediction {
                asset: Asset::new(symbol, description, kind),
                direction,
                timeframe,
                count,
            },
        )
        .collect()
}
