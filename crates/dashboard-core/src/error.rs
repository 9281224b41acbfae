use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}
