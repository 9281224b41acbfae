use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashboard_core::{Bar, DashboardError, MarketDataProvider, NewsHeadline};
use std::time::Duration as StdDuration;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

const LOOKBACK_DAYS: i64 = 365;

/// HTTP client for the Yahoo Finance chart and search endpoints.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(StdDuration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DashboardError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DashboardError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DashboardError::ApiError(e.to_string()))
    }

    /// Fetch daily bars between two unix timestamps.
    async fn fetch_chart(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Vec<Bar>, DashboardError> {
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            CHART_URL, symbol, period1, period2
        );

        let json = self.get_json(&url).await?;

        let chart = match json
            .get("chart")
            .and_then(|v| v.get("result"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
        {
            Some(chart) => chart,
            // Yahoo reports unknown symbols as a null result set; the
            // orchestrator treats an empty history as an invalid ticker.
            None => return Ok(Vec::new()),
        };

        let timestamps = match chart.get("timestamp").and_then(|v| v.as_array()) {
            Some(ts) => ts,
            None => return Ok(Vec::new()),
        };

        let quote = chart
            .get("indicators")
            .and_then(|v| v.get("quote"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .ok_or_else(|| DashboardError::ApiError("No quote data in chart response".into()))?;

        let field = |name: &str| -> Result<&Vec<serde_json::Value>, DashboardError> {
            quote
                .get(name)
                .and_then(|v| v.as_array())
                .ok_or_else(|| DashboardError::ApiError(format!("No {} prices", name)))
        };

        let opens = field("open")?;
        let highs = field("high")?;
        let lows = field("low")?;
        let closes = field("close")?;
        let volumes = field("volume")?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for i in 0..timestamps.len() {
            // Rows with any null field (halted days, stale rows) are skipped.
            if let (Some(ts), Some(o), Some(h), Some(l), Some(c), Some(v)) = (
                timestamps[i].as_i64(),
                opens.get(i).and_then(|v| v.as_f64()),
                highs.get(i).and_then(|v| v.as_f64()),
                lows.get(i).and_then(|v| v.as_f64()),
                closes.get(i).and_then(|v| v.as_f64()),
                volumes.get(i).and_then(|v| v.as_f64()),
            ) {
                let timestamp = DateTime::from_timestamp(ts, 0)
                    .ok_or_else(|| DashboardError::ApiError("Invalid timestamp".into()))?;
                bars.push(Bar {
                    timestamp,
                    open: o,
                    high: h,
                    low: l,
                    close: c,
                    volume: v,
                });
            }
        }

        tracing::debug!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<Bar>, DashboardError> {
        let now = Utc::now();
        let from = now - Duration::days(LOOKBACK_DAYS);
        self.fetch_chart(symbol, from.timestamp(), now.timestamp())
            .await
    }

    async fn recent_news(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, DashboardError> {
        let url = format!("{}?q={}&newsCount={}", SEARCH_URL, symbol, limit);

        let json = self.get_json(&url).await?;

        let items = json
            .get("news")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DashboardError::ApiError("No news in search response".into()))?;

        let headlines: Vec<NewsHeadline> = items
            .iter()
            .take(limit)
            .filter_map(|item| {
                let title = item.get("title").and_then(|v| v.as_str())?.to_string();
                Some(NewsHeadline {
                    title,
                    publisher: item
                        .get("publisher")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    published_utc: item
                        .get("providerPublishTime")
                        .and_then(|v| v.as_i64())
                        .and_then(|ts| DateTime::from_timestamp(ts, 0)),
                    link: item.get("link").and_then(|v| v.as_str()).map(String::from),
                })
            })
            .collect();

        tracing::debug!("Fetched {} headlines for {}", headlines.len(), symbol);
        Ok(headlines)
    }
}
