use common::models::{Asset, AssetKind};
use serde::Deserialize;

use crate::{error::GatewayError, traits::RemoteResponse};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub result: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_symbol: String,
    #[serde(rename(deserialize = "type"), default)]
    pub kind: String,
}

impl SearchHit {
    fn asset_kind(&self) -> AssetKind {
        if self.kind.eq_ignore_ascii_case("crypto") {
            AssetKind::Crypto
        } else {
            AssetKind::Stock
        }
    }
}

impl RemoteResponse<Vec<Asset>> for SearchResponse {
    fn to_model(&self, _query: &str) -> Result<Vec<Asset>, GatewayError> {
        let hits = self.result.as_deref().unwrap_or_default();

        Ok(hits
            .iter()
            .map(|hit| Asset {
                symbol: hit.symbol.clone(),
                description: hit.description.clone(),
                display_symbol: if hit.display_symbol.is_empty() {
                    hit.symbol.clone()
                } else {
                    hit.display_symbol.clone()
                },
                kind: hit.asset_kind(),
            })
            .collect())
    }
}
