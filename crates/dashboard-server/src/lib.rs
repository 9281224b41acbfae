//! HTTP surface for the stock dashboard.
//!
//! Two routes: `GET /` serves the request form, `POST /result` runs the
//! analysis pipeline and renders the report page with inline charts.

mod templates;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::Form;
use dashboard_core::DashboardError;
use dashboard_orchestrator::{DashboardOrchestrator, DashboardRequest};
use market_data::YahooFinanceClient;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Tickers offered in the comparison checklist.
pub const STOCK_LIST: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];
/// Checklist entries pre-checked on the form.
pub const DEFAULT_CHECKED: &[&str] = &["AAPL", "MSFT"];

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DashboardOrchestrator<YahooFinanceClient>>,
}

/// Wrapper turning unexpected errors into a generic 500 page.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h3>Something went wrong. Please try again.</h3>".to_string()),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Deserialize)]
struct AnalyzeForm {
    ticker: String,
    ma_period: usize,
    bb_period: usize,
    #[serde(default)]
    compare_stocks: Vec<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/result", post(analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(templates::render_index(STOCK_LIST, DEFAULT_CHECKED))
}

async fn analyze(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Html<String>, AppError> {
    let request = DashboardRequest {
        ticker: form.ticker,
        ma_period: form.ma_period,
        bb_period: form.bb_period,
        compare: form.compare_stocks,
    };

    match state.orchestrator.analyze(&request).await {
        Ok(report) => Ok(Html(templates::render_result(&report))),
        // Invalid input is reported inline, not as an HTTP error.
        Err(DashboardError::InvalidInput(msg)) => Ok(Html(templates::render_inline_error(&msg))),
        Err(e) => Err(e.into()),
    }
}

/// Start the server: owns the listener for its whole lifetime and shuts
/// down cleanly on ctrl-c.
pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState {
        orchestrator: Arc::new(DashboardOrchestrator::new(YahooFinanceClient::new())),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Stock dashboard listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
