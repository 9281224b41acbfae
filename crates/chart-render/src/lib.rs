pub mod charts;
pub mod heatmap;

pub use charts::*;
pub use heatmap::*;

use base64::Engine;
use dashboard_core::DashboardError;
use serde::Serialize;
use std::io::Cursor;

pub const LINE_CHART_WIDTH: u32 = 1000;
pub const LINE_CHART_HEIGHT: u32 = 400;
pub const HEATMAP_WIDTH: u32 = 640;
pub const HEATMAP_HEIGHT: u32 = 480;

/// A rendered chart, PNG-encoded and base64'd for inline embedding.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedChart {
    pub base64_png: String,
    pub width: u32,
    pub height: u32,
}

pub(crate) fn render_error<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::RenderError(e.to_string())
}

/// Encode a raw RGB pixel buffer as a base64 PNG payload.
pub(crate) fn encode_rgb_buffer(
    buf: Vec<u8>,
    width: u32,
    height: u32,
) -> Result<RenderedChart, DashboardError> {
    let img = image::RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| DashboardError::RenderError("pixel buffer size mismatch".to_string()))?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(render_error)?;

    Ok(RenderedChart {
        base64_png: base64::engine::general_purpose::STANDARD.encode(&png),
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) fn decode_png_header(chart: &RenderedChart) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(&chart.base64_png)
        .expect("valid base64")
}
