//! Viewport transform.
//!
//! Pure, stateless affine maps between pixel coordinates and `(time, price)`
//! domain coordinates. The transform is a snapshot of the current view: it
//! knows nothing about sessions or cells, and every method is exactly
//! invertible up to floating-point rounding.

use crate::error::{EngineError, Result};
use crate::types::{price_to_fixed, ViewState};

/// Inputs fixing one viewport snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ViewportParams {
    pub view: ViewState,
    pub width_px: f64,
    pub height_px: f64,
    /// Index of the most recent bar in the chart's bar series
    pub latest_bar_index: f64,
    /// Open time of the most recent bar, epoch seconds
    pub latest_bar_time: i64,
    /// Duration of one bar, seconds
    pub timeframe_secs: i64,
    /// Unzoomed price domain
    pub price_domain_min: f64,
    pub price_domain_max: f64,
    /// Fraction of the viewport width left of the "now" pixel column
    pub past_fraction: f64,
}

/// Affine pixel <-> domain mapping for one viewport snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ViewportTransform {
    height_px: f64,
    /// Visible price span after zoom and vertical pan
    visible_min: f64,
    visible_max: f64,
    /// Pixel column where "now" (the latest bar) sits
    now_x: f64,
    pixels_per_bar: f64,
    pan_offset_bars: f64,
    latest_bar_index: f64,
    latest_bar_time: i64,
    timeframe_secs: i64,
}

impl ViewportTransform {
    /// Build a transform, rejecting degenerate geometry rather than
    /// clamping it.
    pub fn new(params: ViewportParams) -> Result<Self> {
        let ViewportParams {
            view,
            width_px,
            height_px,
            latest_bar_index,
            latest_bar_time,
            timeframe_secs,
            price_domain_min,
            price_domain_max,
            past_fraction,
        } = params;

        if !(width_px > 0.0 && height_px > 0.0) {
            return Err(EngineError::InvalidViewport(format!(
                "viewport must have positive size, got {width_px}x{height_px}"
            )));
        }
        if !(past_fraction > 0.0 && past_fraction <= 1.0) {
            return Err(EngineError::InvalidViewport(format!(
                "past fraction must be in (0, 1], got {past_fraction}"
            )));
        }
        if view.visible_bar_count == 0 {
            return Err(EngineError::InvalidViewport(
                "visible bar count must be >= 1".to_string(),
            ));
        }
        if !(view.zoom_factor.is_finite() && view.zoom_factor > 0.0) {
            return Err(EngineError::InvalidViewport(format!(
                "zoom factor must be positive, got {}",
                view.zoom_factor
            )));
        }
        if !(price_domain_min < price_domain_max) {
            return Err(EngineError::InvalidViewport(format!(
                "price domain must be non-empty, got [{price_domain_min}, {price_domain_max}]"
            )));
        }
        if timeframe_secs < 1 {
            return Err(EngineError::InvalidViewport(
                "timeframe must be >= 1 second".to_string(),
            ));
        }

        // Zoom divides the price span; vertical pan shifts its center.
        let center =
            (price_domain_min + price_domain_max) / 2.0 + view.vertical_pan_offset_price;
        let half_span = (price_domain_max - price_domain_min) / (2.0 * view.zoom_factor);

        let now_x = width_px * past_fraction;
        let pixels_per_bar = now_x / view.visible_bar_count as f64;

        Ok(Self {
            height_px,
            visible_min: center - half_span,
            visible_max: center + half_span,
            now_x,
            pixels_per_bar,
            pan_offset_bars: view.pan_offset_bars,
            latest_bar_index,
            latest_bar_time,
            timeframe_secs,
        })
    }

    /// Map a price in quote units to a pixel row (0 at the top).
    pub fn price_to_y(&self, price: f64) -> f64 {
        let span = self.visible_max - self.visible_min;
        self.height_px * (self.visible_max - price) / span
    }

    /// Map a pixel row back to a price in quote units.
    pub fn y_to_price(&self, y: f64) -> f64 {
        let span = self.visible_max - self.visible_min;
        self.visible_max - (y / self.height_px) * span
    }

    /// Map a (fractional) bar index to a pixel column.
    pub fn bar_index_to_x(&self, index: f64) -> f64 {
        self.now_x + (index - self.latest_bar_index + self.pan_offset_bars) * self.pixels_per_bar
    }

    /// Map a pixel column back to a fractional bar index.
    pub fn x_to_bar_index(&self, x: f64) -> f64 {
        (x - self.now_x) / self.pixels_per_bar + self.latest_bar_index - self.pan_offset_bars
    }

    /// Map a pixel column to a wall-clock timestamp, composing the bar-index
    /// map with the bar series' time base.
    pub fn x_to_timestamp(&self, x: f64) -> f64 {
        let index = self.x_to_bar_index(x);
        self.latest_bar_time as f64 + (index - self.latest_bar_index) * self.timeframe_secs as f64
    }

    /// Map a wall-clock timestamp to a pixel column.
    pub fn timestamp_to_x(&self, timestamp_secs: f64) -> f64 {
        let index = self.latest_bar_index
            + (timestamp_secs - self.latest_bar_time as f64) / self.timeframe_secs as f64;
        self.bar_index_to_x(index)
    }

    /// Convert a pixel coordinate to the `(timestamp, fixed-point price)`
    /// domain point used for cell resolution.
    pub fn pixel_to_point(&self, x: f64, y: f64) -> (i64, i64) {
        let timestamp = self.x_to_timestamp(x).floor() as i64;
        let price = price_to_fixed(self.y_to_price(y));
        (timestamp, price)
    }
}
