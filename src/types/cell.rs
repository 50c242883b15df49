//! Grid cell types.

use serde::{Deserialize, Serialize};

/// Discrete grid coordinate, relative to the session anchor.
///
/// `cell_x` counts whole columns from the session's reference time; `cell_y`
/// is a signed row offset from the row containing the reference price.
/// Negative `cell_x` addresses columns before session creation (reachable by
/// panning into history).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellId {
    pub cell_x: i64,
    pub cell_y: i64,
}

impl CellId {
    pub fn new(cell_x: i64, cell_y: i64) -> Self {
        Self { cell_x, cell_y }
    }

    /// Direction implied by the cell's row: rows below the reference price
    /// are long, the reference row itself and everything above are short.
    pub fn is_long(&self) -> bool {
        self.cell_y < 0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.cell_x, self.cell_y)
    }
}

/// Canonical rectangle covered by one cell: a half-open time window and a
/// half-open price band, both in session-anchor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBounds {
    /// Column start, epoch seconds (inclusive)
    pub start_time: i64,
    /// Column end, epoch seconds (exclusive)
    pub end_time: i64,
    /// Bottom of the price band, 10^8 fixed point (inclusive)
    pub price_low: i64,
    /// Top of the price band, 10^8 fixed point (exclusive)
    pub price_high: i64,
}

impl CellBounds {
    /// Whether a `(timestamp, price)` point falls inside this rectangle.
    pub fn contains(&self, timestamp_secs: i64, price: i64) -> bool {
        timestamp_secs >= self.start_time
            && timestamp_secs < self.end_time
            && price >= self.price_low
            && price < self.price_high
    }
}

/// Per-cell order accumulator entry.
///
/// `order_count` only ever grows while the session is active; rapid taps on
/// the same cell stack independent full-margin orders rather than toggling a
/// selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellOrderInfo {
    /// Number of acknowledged orders on this cell
    pub order_count: u32,
    /// Trigger price derived from the cell's row, 10^8 fixed point
    #[serde(with = "crate::types::string_i64")]
    pub trigger_price: i64,
    /// Column start, epoch seconds
    pub start_time: i64,
    /// Column end, epoch seconds
    pub end_time: i64,
    /// Direction derived from the cell's row
    pub is_long: bool,
}
