use crate::{Bar, DashboardError, NewsHeadline};
use async_trait::async_trait;

/// Trait for market data providers
///
/// The orchestrator is generic over this seam so tests can inject a
/// scripted provider instead of hitting the network.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// One year of daily OHLCV history, ascending by timestamp.
    /// An empty result means the symbol is unknown to the provider.
    async fn daily_history(&self, symbol: &str) -> Result<Vec<Bar>, DashboardError>;

    /// Up to `limit` most recent news headlines for the symbol.
    async fn recent_news(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, DashboardError>;
}
