use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Close prices for one ticker, keyed by calendar date.
#[derive(Debug, Clone)]
pub struct CloseSeries {
    pub symbol: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Pairwise Pearson correlation matrix over a set of tickers.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }

    let a = &a[..n];
    let b = &b[..n];

    let mean_a: f64 = a.iter().sum::<f64>() / n as f64;
    let mean_b: f64 = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        cov / denom
    }
}

/// Build the pairwise correlation matrix over date-aligned close series.
///
/// Series with no data are dropped up front; at least two surviving
/// tickers are required, otherwise there is nothing to correlate and
/// `None` is returned. Each pair is correlated over the dates both
/// tickers actually traded; pairs sharing fewer than two dates score 0.
pub fn correlation_matrix(series: &[CloseSeries]) -> Option<CorrelationMatrix> {
    let surviving: Vec<&CloseSeries> = series.iter().filter(|s| !s.points.is_empty()).collect();
    if surviving.len() < 2 {
        return None;
    }

    let tables: Vec<BTreeMap<NaiveDate, f64>> = surviving
        .iter()
        .map(|s| s.points.iter().copied().collect())
        .collect();

    let n = surviving.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in i + 1..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (date, x) in &tables[i] {
                if let Some(y) = tables[j].get(date) {
                    xs.push(*x);
                    ys.push(*y);
                }
            }
            let corr = pearson_correlation(&xs, &ys);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    Some(CorrelationMatrix {
        symbols: surviving.iter().map(|s| s.symbol.clone()).collect(),
        values,
    })
}
