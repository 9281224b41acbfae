use chart_render::RenderedChart;
use chrono::NaiveDate;
use dashboard_core::{DashboardError, MarketDataProvider, ScoredHeadline, SectionOutcome};
use news_sentiment::SentimentScorer;
use serde::Serialize;
use technical_indicators::CloseSeries;

const NEWS_LIMIT: usize = 5;
const BOLLINGER_STD_DEVS: f64 = 2.0;

/// Validated form input for one dashboard request.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub ticker: String,
    pub ma_period: usize,
    pub bb_period: usize,
    pub compare: Vec<String>,
}

/// Everything the result page needs. Sections that can fail soft carry
/// a `SectionOutcome`; the correlation chart is simply absent when too
/// few comparison tickers have data.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub ticker: String,
    pub ma_period: usize,
    pub bb_period: usize,
    pub ma_chart: RenderedChart,
    pub bollinger_chart: RenderedChart,
    pub forecast_chart: SectionOutcome<RenderedChart>,
    pub sentiment: SectionOutcome<Vec<ScoredHeadline>>,
    pub correlation_chart: Option<RenderedChart>,
}

/// Runs the full analysis pipeline for one request: fetch history, then
/// indicators, forecast, sentiment and correlation, each rendered to an
/// inline chart. All steps run sequentially on the request task.
pub struct DashboardOrchestrator<P> {
    provider: P,
    scorer: SentimentScorer,
}

impl<P: MarketDataProvider> DashboardOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            scorer: SentimentScorer::new(),
        }
    }

    pub async fn analyze(
        &self,
        request: &DashboardRequest,
    ) -> Result<DashboardReport, DashboardError> {
        let ticker = request.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(DashboardError::InvalidInput(
                "ticker symbol must not be empty".to_string(),
            ));
        }
        if request.ma_period == 0 || request.bb_period == 0 {
            return Err(DashboardError::InvalidInput(
                "indicator periods must be positive".to_string(),
            ));
        }

        tracing::info!(
            "Analyzing {} (ma={}, bb={}, compare={:?})",
            ticker,
            request.ma_period,
            request.bb_period,
            request.compare
        );

        let bars = self.provider.daily_history(&ticker).await?;
        if bars.is_empty() {
            return Err(DashboardError::InvalidInput(format!(
                "Invalid stock symbol {}",
                ticker
            )));
        }

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.timestamp.date_naive()).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let ma = technical_indicators::sma(&closes, request.ma_period);
        let ma_chart =
            chart_render::moving_average_chart(&ticker, &dates, &closes, request.ma_period, &ma)?;

        let bands =
            technical_indicators::bollinger_bands(&closes, request.bb_period, BOLLINGER_STD_DEVS);
        let bollinger_chart =
            chart_render::bollinger_chart(&ticker, &dates, &closes, request.bb_period, &bands)?;

        let forecast_chart = self.forecast_section(&ticker, &dates, &closes);
        let sentiment = self.sentiment_section(&ticker).await;
        let correlation_chart = self.correlation_section(&ticker, &request.compare).await;

        Ok(DashboardReport {
            ticker,
            ma_period: request.ma_period,
            bb_period: request.bb_period,
            ma_chart,
            bollinger_chart,
            forecast_chart,
            sentiment,
            correlation_chart,
        })
    }

    fn forecast_section(
        &self,
        ticker: &str,
        dates: &[NaiveDate],
        closes: &[f64],
    ) -> SectionOutcome<RenderedChart> {
        let result = forecasting::forecast_closes(closes).and_then(|forecast| {
            chart_render::forecast_chart(
                ticker,
                dates,
                &forecast.train,
                &forecast.test,
                &forecast.predicted,
            )
        });

        if let Err(e) = &result {
            tracing::warn!("Forecast failed for {}: {}", ticker, e);
        }
        SectionOutcome::from_result(result)
    }

    async fn sentiment_section(&self, ticker: &str) -> SectionOutcome<Vec<ScoredHeadline>> {
        match self.provider.recent_news(ticker, NEWS_LIMIT).await {
            Ok(headlines) => SectionOutcome::Ready(self.scorer.score_headlines(&headlines)),
            Err(e) => {
                tracing::warn!("News fetch failed for {}: {}", ticker, e);
                SectionOutcome::unavailable(e.to_string())
            }
        }
    }

    /// Fetch every comparison ticker's history and render the heatmap.
    /// Tickers that fetch empty (or error) are silently dropped; fewer
    /// than two survivors means no chart.
    async fn correlation_section(
        &self,
        ticker: &str,
        compare: &[String],
    ) -> Option<RenderedChart> {
        if compare.len() <= 1 {
            return None;
        }

        let mut series = Vec::with_capacity(compare.len());
        for symbol in compare {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            let points = match self.provider.daily_history(&symbol).await {
                Ok(bars) => bars
                    .iter()
                    .map(|b| (b.timestamp.date_naive(), b.close))
                    .collect(),
                Err(e) => {
                    tracing::warn!("Comparison fetch failed for {}: {}", symbol, e);
                    Vec::new()
                }
            };
            series.push(CloseSeries { symbol, points });
        }

        let matrix = technical_indicators::correlation_matrix(&series)?;

        match chart_render::correlation_heatmap(&matrix) {
            Ok(chart) => Some(chart),
            Err(e) => {
                tracing::warn!("Correlation heatmap failed for {}: {}", ticker, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use dashboard_core::{Bar, NewsHeadline};
    use std::collections::HashMap;

    struct MockProvider {
        histories: HashMap<String, Vec<Bar>>,
        news: Result<Vec<NewsHeadline>, String>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                histories: HashMap::new(),
                news: Ok(Vec::new()),
            }
        }

        fn with_history(mut self, symbol: &str, days: usize) -> Self {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let bars = (0..days)
                .map(|i| {
                    let close = 100.0 + i as f64 * 0.5 + ((i % 5) as f64 - 2.0);
                    Bar {
                        timestamp: start + Duration::days(i as i64),
                        open: close - 0.5,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        volume: 1_000_000.0,
                    }
                })
                .collect();
            self.histories.insert(symbol.to_string(), bars);
            self
        }

        fn with_news(mut self, titles: &[&str]) -> Self {
            self.news = Ok(titles
                .iter()
                .map(|t| NewsHeadline {
                    title: t.to_string(),
                    publisher: None,
                    published_utc: None,
                    link: None,
                })
                .collect());
            self
        }

        fn with_news_failure(mut self, reason: &str) -> Self {
            self.news = Err(reason.to_string());
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn daily_history(&self, symbol: &str) -> Result<Vec<Bar>, DashboardError> {
            Ok(self.histories.get(symbol).cloned().unwrap_or_default())
        }

        async fn recent_news(
            &self,
            _symbol: &str,
            limit: usize,
        ) -> Result<Vec<NewsHeadline>, DashboardError> {
            match &self.news {
                Ok(items) => Ok(items.iter().take(limit).cloned().collect()),
                Err(reason) => Err(DashboardError::ApiError(reason.clone())),
            }
        }
    }

    fn request(ticker: &str, compare: &[&str]) -> DashboardRequest {
        DashboardRequest {
            ticker: ticker.to_string(),
            ma_period: 20,
            bb_period: 20,
            compare: compare.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_full_report_with_two_comparison_tickers() {
        let provider = MockProvider::new()
            .with_history("AAPL", 250)
            .with_history("MSFT", 250)
            .with_news(&["Record profit surge", "Lawsuit risk grows"]);
        let orchestrator = DashboardOrchestrator::new(provider);

        let report = orchestrator
            .analyze(&request("aapl", &["AAPL", "MSFT"]))
            .await
            .unwrap();

        assert_eq!(report.ticker, "AAPL");
        assert!(!report.ma_chart.base64_png.is_empty());
        assert!(!report.bollinger_chart.base64_png.is_empty());
        assert!(report.forecast_chart.is_ready());
        assert!(report.sentiment.is_ready());
        assert_eq!(report.sentiment.ready().unwrap().len(), 2);
        assert!(report.correlation_chart.is_some());
    }

    #[tokio::test]
    async fn test_invalid_symbol_fails_fast() {
        let orchestrator = DashboardOrchestrator::new(MockProvider::new());
        let result = orchestrator.analyze(&request("ZZZZINVALID", &[])).await;

        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let orchestrator = DashboardOrchestrator::new(MockProvider::new());
        let result = orchestrator.analyze(&request("   ", &[])).await;

        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let provider = MockProvider::new().with_history("AAPL", 250);
        let orchestrator = DashboardOrchestrator::new(provider);
        let mut req = request("AAPL", &[]);
        req.ma_period = 0;

        let result = orchestrator.analyze(&req).await;
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_single_comparison_ticker_omits_correlation() {
        let provider = MockProvider::new().with_history("AAPL", 250);
        let orchestrator = DashboardOrchestrator::new(provider);

        let report = orchestrator
            .analyze(&request("AAPL", &["AAPL"]))
            .await
            .unwrap();

        assert!(report.correlation_chart.is_none());
    }

    #[tokio::test]
    async fn test_empty_comparison_fetches_omit_correlation() {
        // Two comparison tickers requested, but only one has data.
        let provider = MockProvider::new().with_history("AAPL", 250);
        let orchestrator = DashboardOrchestrator::new(provider);

        let report = orchestrator
            .analyze(&request("AAPL", &["AAPL", "NODATA"]))
            .await
            .unwrap();

        assert!(report.correlation_chart.is_none());
    }

    #[tokio::test]
    async fn test_news_failure_is_soft() {
        let provider = MockProvider::new()
            .with_history("AAPL", 250)
            .with_news_failure("news source down");
        let orchestrator = DashboardOrchestrator::new(provider);

        let report = orchestrator.analyze(&request("AAPL", &[])).await.unwrap();

        assert!(!report.sentiment.is_ready());
        assert!(report.sentiment.reason().unwrap().contains("news source down"));
        // Other sections are unaffected.
        assert!(report.forecast_chart.is_ready());
    }

    #[tokio::test]
    async fn test_short_history_forecast_fails_soft() {
        let provider = MockProvider::new().with_history("AAPL", 12);
        let orchestrator = DashboardOrchestrator::new(provider);

        let report = orchestrator.analyze(&request("AAPL", &[])).await.unwrap();

        assert!(!report.forecast_chart.is_ready());
        // Charts still render even though the indicator windows exceed
        // the series length.
        assert!(!report.ma_chart.base64_png.is_empty());
        assert!(!report.bollinger_chart.base64_png.is_empty());
    }
}
