//! Market data provider interface for future data source integration.
//!
//! The exchange/market-data adapters live behind this boundary and are not
//! part of the engine.

use crate::models::market::MarketSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Assemble the latest data bundle for a symbol: candles plus whatever
    /// indicator bundles the upstream pipelines have computed.
    async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<MarketSnapshot, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct PlaceholderMarketDataProvider;

#[async_trait]
impl MarketDataProvider for PlaceholderMarketDataProvider {
    async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<MarketSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        Ok(MarketSnapshot::new(symbol))
    }
}
