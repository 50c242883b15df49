//! Ephemeral view state.

/// Pan/zoom state of the chart viewport.
///
/// Deliberately not part of grid identity: mutating any of these fields
/// changes where a cell is drawn, never which cell a given `(time, price)`
/// point resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Horizontal pan, in bar units (positive shifts the chart toward
    /// history)
    pub pan_offset_bars: f64,
    /// Vertical pan, in price units (shifts the visible span's center)
    pub vertical_pan_offset_price: f64,
    /// Zoom factor (> 0); divides the visible price span
    pub zoom_factor: f64,
    /// Number of bars visible left of the now column
    pub visible_bar_count: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan_offset_bars: 0.0,
            vertical_pan_offset_price: 0.0,
            zoom_factor: 1.0,
            visible_bar_count: 120,
        }
    }
}
