use chrono::NaiveDate;
use dashboard_core::DashboardError;
use plotters::prelude::*;
use technical_indicators::BollingerBands;

use crate::{encode_rgb_buffer, render_error, RenderedChart, LINE_CHART_HEIGHT, LINE_CHART_WIDTH};

const CLOSE_COLOR: RGBColor = RGBColor(31, 119, 180);
const OVERLAY_COLOR: RGBColor = RGBColor(255, 127, 14);
const TEST_COLOR: RGBColor = RGBColor(44, 160, 44);
const FORECAST_COLOR: RGBColor = RGBColor(214, 39, 40);
const BAND_FILL: RGBColor = RGBColor(128, 128, 128);

/// Padded y range over every value of every overlay.
fn y_range(series: &[&[f64]]) -> Result<(f64, f64), DashboardError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for s in series {
        for &v in *s {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    if !min.is_finite() || !max.is_finite() {
        return Err(DashboardError::InsufficientData(
            "no finite values to plot".to_string(),
        ));
    }

    let pad = ((max - min) * 0.05).max(1e-6);
    Ok((min - pad, max + pad))
}

fn indexed(values: &[f64], offset: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .map(move |(i, &v)| ((i + offset) as f64, v))
}

/// Close price with a trailing moving average overlay.
pub fn moving_average_chart(
    symbol: &str,
    dates: &[NaiveDate],
    closes: &[f64],
    ma_period: usize,
    ma: &[f64],
) -> Result<RenderedChart, DashboardError> {
    let (y_min, y_max) = y_range(&[closes, ma])?;
    let title = format!("{} - Moving Average", symbol);
    let ma_label = format!("{}-Day MA", ma_period);
    let ma_offset = ma_period.saturating_sub(1);

    let mut buf = vec![0u8; (LINE_CHART_WIDTH * LINE_CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (LINE_CHART_WIDTH, LINE_CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..closes.len().max(1) as f64, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| label_for_date(dates, *x))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(indexed(closes, 0), &CLOSE_COLOR))
            .map_err(render_error)?
            .label("Close Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CLOSE_COLOR));

        chart
            .draw_series(LineSeries::new(indexed(ma, ma_offset), &OVERLAY_COLOR))
            .map_err(render_error)?
            .label(ma_label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], OVERLAY_COLOR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_rgb_buffer(buf, LINE_CHART_WIDTH, LINE_CHART_HEIGHT)
}

/// Close price with Bollinger band lines and a shaded band area.
pub fn bollinger_chart(
    symbol: &str,
    dates: &[NaiveDate],
    closes: &[f64],
    bb_period: usize,
    bands: &BollingerBands,
) -> Result<RenderedChart, DashboardError> {
    let (y_min, y_max) = y_range(&[closes, &bands.upper, &bands.lower])?;
    let title = format!("{} - Bollinger Bands", symbol);
    let offset = bb_period.saturating_sub(1);

    let mut buf = vec![0u8; (LINE_CHART_WIDTH * LINE_CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (LINE_CHART_WIDTH, LINE_CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..closes.len().max(1) as f64, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| label_for_date(dates, *x))
            .draw()
            .map_err(render_error)?;

        // Shaded area between the bands, drawn first so the lines sit on top.
        if !bands.upper.is_empty() {
            let mut polygon: Vec<(f64, f64)> = indexed(&bands.upper, offset).collect();
            polygon.extend(indexed(&bands.lower, offset).collect::<Vec<_>>().into_iter().rev());
            chart
                .draw_series(std::iter::once(Polygon::new(polygon, BAND_FILL.mix(0.2))))
                .map_err(render_error)?;
        }

        chart
            .draw_series(LineSeries::new(indexed(closes, 0), &CLOSE_COLOR))
            .map_err(render_error)?
            .label("Close Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CLOSE_COLOR));

        if !bands.upper.is_empty() {
            chart
                .draw_series(LineSeries::new(indexed(&bands.upper, offset), &FORECAST_COLOR))
                .map_err(render_error)?
                .label("Upper Band")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR));

            chart
                .draw_series(LineSeries::new(indexed(&bands.lower, offset), &TEST_COLOR))
                .map_err(render_error)?
                .label("Lower Band")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TEST_COLOR));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_rgb_buffer(buf, LINE_CHART_WIDTH, LINE_CHART_HEIGHT)
}

/// Train, held-out test, and forecast segments on a shared time axis.
pub fn forecast_chart(
    symbol: &str,
    dates: &[NaiveDate],
    train: &[f64],
    test: &[f64],
    predicted: &[f64],
) -> Result<RenderedChart, DashboardError> {
    let (y_min, y_max) = y_range(&[train, test, predicted])?;
    let title = format!("{} - ARIMA Forecast", symbol);
    let total = train.len() + test.len();

    let mut buf = vec![0u8; (LINE_CHART_WIDTH * LINE_CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (LINE_CHART_WIDTH, LINE_CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..total.max(1) as f64, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| label_for_date(dates, *x))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(indexed(train, 0), &CLOSE_COLOR))
            .map_err(render_error)?
            .label("Train")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CLOSE_COLOR));

        chart
            .draw_series(LineSeries::new(indexed(test, train.len()), &TEST_COLOR))
            .map_err(render_error)?
            .label("Test")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TEST_COLOR));

        chart
            .draw_series(LineSeries::new(indexed(predicted, train.len()), &FORECAST_COLOR))
            .map_err(render_error)?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_rgb_buffer(buf, LINE_CHART_WIDTH, LINE_CHART_HEIGHT)
}

fn label_for_date(dates: &[NaiveDate], x: f64) -> String {
    let i = x.round() as usize;
    dates
        .get(i)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_png_header;
    use technical_indicators::bollinger_bands;

    fn sample_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn sample_closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.4) + ((i % 7) as f64 - 3.0))
            .collect()
    }

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_moving_average_chart_renders_png() {
        let closes = sample_closes(60);
        let ma = technical_indicators::sma(&closes, 20);
        let chart =
            moving_average_chart("AAPL", &sample_dates(60), &closes, 20, &ma).unwrap();

        let bytes = decode_png_header(&chart);
        assert_eq!(&bytes[..8], &PNG_MAGIC);
        assert_eq!(chart.width, LINE_CHART_WIDTH);
    }

    #[test]
    fn test_bollinger_chart_renders_with_empty_bands() {
        // Window larger than the series: bands are empty but the close
        // line still renders.
        let closes = sample_closes(10);
        let bands = bollinger_bands(&closes, 20, 2.0);
        let chart = bollinger_chart("AAPL", &sample_dates(10), &closes, 20, &bands).unwrap();

        let bytes = decode_png_header(&chart);
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_forecast_chart_renders_png() {
        let closes = sample_closes(100);
        let (train, test) = closes.split_at(80);
        let predicted: Vec<f64> = test.iter().map(|v| v + 1.0).collect();
        let chart =
            forecast_chart("AAPL", &sample_dates(100), train, test, &predicted).unwrap();

        let bytes = decode_png_header(&chart);
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let result = moving_average_chart("AAPL", &[], &[], 20, &[]);
        assert!(result.is_err());
    }
}
