use dashboard_core::DashboardError;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use technical_indicators::CorrelationMatrix;

use crate::{encode_rgb_buffer, render_error, RenderedChart, HEATMAP_HEIGHT, HEATMAP_WIDTH};

/// Map a correlation in [-1, 1] onto a blue-white-red gradient.
fn cell_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let blend = |from: u8, to: u8, t: f64| -> u8 {
        (from as f64 + (to as f64 - from as f64) * t).round() as u8
    };

    if v >= 0.0 {
        // white -> red
        RGBColor(
            blend(255, 178, v),
            blend(255, 24, v),
            blend(255, 43, v),
        )
    } else {
        // white -> blue
        RGBColor(
            blend(255, 33, -v),
            blend(255, 102, -v),
            blend(255, 172, -v),
        )
    }
}

/// Annotated correlation heatmap over the compared tickers.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Result<RenderedChart, DashboardError> {
    let n = matrix.symbols.len();
    if n < 2 || matrix.values.len() != n {
        return Err(DashboardError::InsufficientData(
            "correlation heatmap needs at least two tickers".to_string(),
        ));
    }

    let symbols = matrix.symbols.clone();
    let mut buf = vec![0u8; (HEATMAP_WIDTH * HEATMAP_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (HEATMAP_WIDTH, HEATMAP_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Market Correlation", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0i32..n as i32).into_segmented(),
                (0i32..n as i32).into_segmented(),
            )
            .map_err(render_error)?;

        let x_symbols = symbols.clone();
        let y_symbols = symbols.clone();
        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&move |seg| segment_label(seg, &x_symbols))
            .y_label_formatter(&move |seg| segment_label(seg, &y_symbols))
            .x_labels(n)
            .y_labels(n)
            .draw()
            .map_err(render_error)?;

        for i in 0..n {
            for j in 0..n {
                let value = matrix.values[i][j];
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [
                            (SegmentValue::Exact(i as i32), SegmentValue::Exact(j as i32)),
                            (
                                SegmentValue::Exact(i as i32 + 1),
                                SegmentValue::Exact(j as i32 + 1),
                            ),
                        ],
                        cell_color(value).filled(),
                    )))
                    .map_err(render_error)?;

                let style = ("sans-serif", 16)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!("{:.2}", value),
                        (
                            SegmentValue::CenterOf(i as i32),
                            SegmentValue::CenterOf(j as i32),
                        ),
                        style,
                    )))
                    .map_err(render_error)?;
            }
        }

        root.present().map_err(render_error)?;
    }

    encode_rgb_buffer(buf, HEATMAP_WIDTH, HEATMAP_HEIGHT)
}

fn segment_label(seg: &SegmentValue<i32>, symbols: &[String]) -> String {
    match seg {
        SegmentValue::CenterOf(i) => symbols
            .get(*i as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}
