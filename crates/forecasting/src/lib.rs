use dashboard_core::DashboardError;
use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;

/// Autoregressive order of the ARIMA(5,1,0) model.
pub const AR_ORDER: usize = 5;

/// Share of the series used for training; the rest is the forecast horizon.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Train segment, held-out test segment, and the model's prediction for
/// the test horizon. `predicted` always has the same length as `test`.
#[derive(Debug, Clone)]
pub struct ForecastResult {
    pub train: Vec<f64>,
    pub test: Vec<f64>,
    pub predicted: Vec<f64>,
}

/// Chronological 80/20 split: the first ⌊0.8·n⌋ points train the model,
/// the remainder is the held-out horizon.
pub fn split_train_test(closes: &[f64]) -> (&[f64], &[f64]) {
    let train_len = (closes.len() as f64 * TRAIN_FRACTION) as usize;
    closes.split_at(train_len)
}

/// Fit ARIMA(5,1,0) to the close series and forecast the test horizon.
pub fn forecast_closes(closes: &[f64]) -> Result<ForecastResult, DashboardError> {
    let (train, test) = split_train_test(closes);

    if test.is_empty() {
        return Err(DashboardError::InsufficientData(format!(
            "series of {} points leaves no test horizon",
            closes.len()
        )));
    }

    let predicted = fit_forecast(train, test.len())?;

    Ok(ForecastResult {
        train: train.to_vec(),
        test: test.to_vec(),
        predicted,
    })
}

/// Fit an AR(5) model on the first-differenced train series and forecast
/// `horizon` steps ahead, re-integrated onto the last train level.
pub fn fit_forecast(train: &[f64], horizon: usize) -> Result<Vec<f64>, DashboardError> {
    if horizon == 0 {
        return Ok(Vec::new());
    }

    let diffs: Vec<f64> = train.windows(2).map(|w| w[1] - w[0]).collect();

    // Need enough rows for the regression to have any degrees of freedom.
    if diffs.len() < AR_ORDER * 2 + 2 {
        return Err(DashboardError::InsufficientData(format!(
            "{} differenced points, need at least {}",
            diffs.len(),
            AR_ORDER * 2 + 2
        )));
    }

    let last_level = *train.last().ok_or_else(|| {
        DashboardError::InsufficientData("empty train segment".to_string())
    })?;

    // Flat series: the regression is rank-deficient, but the forecast is
    // trivially the mean drift.
    let variance = diffs.as_slice().variance();
    if variance == 0.0 {
        let drift = diffs.as_slice().mean();
        let mut levels = Vec::with_capacity(horizon);
        let mut level = last_level;
        for _ in 0..horizon {
            level += drift;
            levels.push(level);
        }
        return Ok(levels);
    }

    let coeffs = fit_ar(&diffs)?;

    // Recursive multi-step forecast on the differenced scale. Lag values
    // start from the observed tail and shift in each prediction.
    let mut lags: Vec<f64> = diffs[diffs.len() - AR_ORDER..].to_vec();
    let mut levels = Vec::with_capacity(horizon);
    let mut level = last_level;

    for _ in 0..horizon {
        let mut diff = coeffs[0];
        for lag in 0..AR_ORDER {
            diff += coeffs[lag + 1] * lags[lags.len() - 1 - lag];
        }
        if !diff.is_finite() {
            return Err(DashboardError::CalculationError(
                "forecast diverged to a non-finite value".to_string(),
            ));
        }
        lags.push(diff);
        level += diff;
        levels.push(level);
    }

    Ok(levels)
}

/// Least-squares AR(5) fit with intercept: regress each differenced value
/// on its previous five. Returns `[intercept, φ1, …, φ5]`.
fn fit_ar(diffs: &[f64]) -> Result<Vec<f64>, DashboardError> {
    let rows = diffs.len() - AR_ORDER;
    let cols = AR_ORDER + 1;

    let mut x = DMatrix::zeros(rows, cols);
    let mut y = DVector::zeros(rows);

    for t in 0..rows {
        x[(t, 0)] = 1.0;
        for lag in 0..AR_ORDER {
            x[(t, lag + 1)] = diffs[t + AR_ORDER - 1 - lag];
        }
        y[t] = diffs[t + AR_ORDER];
    }

    let svd = x.svd(true, true);
    let solution = svd
        .solve(&y, 1e-10)
        .map_err(|e| DashboardError::CalculationError(format!("AR fit failed: {}", e)))?;

    let coeffs: Vec<f64> = solution.iter().copied().collect();
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(DashboardError::CalculationError(
            "AR fit produced non-finite coefficients".to_string(),
        ));
    }

    Ok(coeffs)
}
