use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Crypto,
}

/// A tradable instrument, identified by its exchange ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub symbol: String,
    pub description: String,
    pub display_symbol: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
}

impl Asset {
    pub fn new(symbol: &str, description: &str, kind: AssetKind) -> Self {
        Self {
            symbol: symbol.to_string(),
            description: description.to_string(),
            display_symbol: symbol.to_string(),
            kind,
        }
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == AssetKind::Crypto
    }

    /// Case-insensitive substring match against symbol and description.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.symbol.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

const POPULAR: &[(&str, &str, AssetKind); 6] = &[
    ("AAPL", "Apple Inc", AssetKind::Stock),
    ("TSLA", "Tesla Inc", AssetKind::Stock),
    ("NVDA", "NVIDIA Corporation", AssetKind::Stock),
    ("BTC", "Bitcoin", AssetKind::Crypto),
    ("ETH", "Ethereum", AssetKind::Crypto),
    ("GOOGL", "Alphabet Inc", AssetKind::Stock),
];

/// The static seed list shown when nothing has been typed yet.
pub fn popular_assets() -> Vec<Asset> {
    POPULAR
        .iter()
        .map(|(symbol, description, kind)| Asset::new(symbol, description, *kind))
        .collect()
}
