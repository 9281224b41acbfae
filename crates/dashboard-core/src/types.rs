use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// News headline as returned by the news provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub publisher: Option<String>,
    pub published_utc: Option<DateTime<Utc>>,
    pub link: Option<String>,
}

/// Polarity classification of a headline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

/// Headline with its polarity score and label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub title: String,
    pub label: SentimentLabel,
    pub score: f64,
}

/// Outcome of one analytical section of the dashboard.
///
/// Analytical steps fail soft: a failure is captured as `Unavailable`
/// with a reason instead of propagating an error, so the other sections
/// of the report still render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SectionOutcome<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> SectionOutcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SectionOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => SectionOutcome::Ready(value),
            Err(e) => SectionOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SectionOutcome::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionOutcome::Ready(value) => Some(value),
            SectionOutcome::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            SectionOutcome::Ready(_) => None,
            SectionOutcome::Unavailable { reason } => Some(reason),
        }
    }
}
