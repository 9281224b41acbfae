use dashboard_core::{NewsHeadline, ScoredHeadline, SentimentLabel};
use std::collections::HashSet;

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't", "hardly",
    "barely", "neither", "nor", "without",
];

const NEGATION_WINDOW: usize = 3;

/// Word-list polarity scorer for news headlines.
pub struct SentimentScorer {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            positive_words: vec![
                "bullish", "rally", "surge", "gain", "profit", "growth", "beat",
                "upgrade", "outperform", "strong", "positive", "rise", "increase",
                "breakthrough", "innovation", "success", "exceed", "momentum",
                "buy", "recommend", "optimistic", "record", "high", "advance",
                "dividend", "buyback", "upside", "recovery", "rebound",
                "expansion", "robust", "raised", "upgraded", "soar", "jump",
            ],
            negative_words: vec![
                "bearish", "decline", "loss", "fall", "plunge", "crash", "miss",
                "downgrade", "underperform", "weak", "negative", "drop", "decrease",
                "concern", "risk", "fail", "disappoint", "slump", "sell",
                "warning", "pessimistic", "low", "retreat", "fear", "trouble",
                "lawsuit", "investigation", "bankruptcy", "layoff", "downside",
                "lowered", "suspended", "recall", "probe", "tumble",
            ],
        }
    }

    /// Polarity of a piece of text in [-1, 1]: the signed fraction of
    /// matched sentiment words, with a 3-token negation window flipping
    /// the sign of a match. Text with no matches scores 0.
    pub fn score(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower
            .split(|c: char| {
                c.is_whitespace() || c == ',' || c == ';' || c == '.' || c == '!' || c == '?'
                    || c == ':'
            })
            .filter(|w| !w.is_empty())
            .collect();

        let positive_set: HashSet<&str> = self.positive_words.iter().copied().collect();
        let negative_set: HashSet<&str> = self.negative_words.iter().copied().collect();
        let negation_set: HashSet<&str> = NEGATION_WORDS.iter().copied().collect();

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| negation_set.contains(*w))
            .map(|(i, _)| i)
            .collect();

        let mut signed: i32 = 0;
        let mut matched: u32 = 0;

        for (i, word) in words.iter().enumerate() {
            let is_positive = positive_set.contains(*word);
            let is_negative = negative_set.contains(*word);

            if !is_positive && !is_negative {
                continue;
            }
            matched += 1;

            let negated = negation_positions
                .iter()
                .any(|&neg_pos| neg_pos < i && (i - neg_pos) <= NEGATION_WINDOW);

            if is_positive {
                signed += if negated { -1 } else { 1 };
            } else {
                signed += if negated { 1 } else { -1 };
            }
        }

        if matched == 0 {
            0.0
        } else {
            signed as f64 / matched as f64
        }
    }

    /// Score a batch of headlines, attaching the sign-based label.
    pub fn score_headlines(&self, headlines: &[NewsHeadline]) -> Vec<ScoredHeadline> {
        headlines
            .iter()
            .map(|h| {
                let score = self.score(&h.title);
                ScoredHeadline {
                    title: h.title.clone(),
                    label: classify(score),
                    score: (score * 100.0).round() / 100.0,
                }
            })
            .collect()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Label from score sign: > 0 Positive, < 0 Negative, 0 Neutral.
pub fn classify(score: f64) -> SentimentLabel {
    if score > 0.0 {
        SentimentLabel::Positive
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
