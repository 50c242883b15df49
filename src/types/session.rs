//! Grid session types.
//!
//! A session fixes the immutable `(reference_time, reference_price)` anchor
//! that all cell addressing is computed against. Panning and zooming the
//! chart never moves the anchor, which is what keeps cell identity stable
//! for the session's whole lifetime.

use serde::{Deserialize, Serialize};

use crate::types::string_i64;

/// Prices are fixed-point integers scaled by 10^8.
pub const PRICE_SCALE: i64 = 100_000_000;

/// Collateral/margin amounts are fixed-point integers scaled by 10^6.
pub const MARGIN_SCALE: i64 = 1_000_000;

/// `grid_size_y_bps` is expressed in basis points (1% = 100).
pub const BPS_DENOMINATOR: i64 = 10_000;

/// Convert a floating-point price in quote units to 10^8 fixed point.
pub fn price_to_fixed(price: f64) -> i64 {
    (price * PRICE_SCALE as f64).round() as i64
}

/// Convert a 10^8 fixed-point price back to quote units.
pub fn fixed_to_price(fixed: i64) -> f64 {
    fixed as f64 / PRICE_SCALE as f64
}

// =============================================================================
// Core Structs
// =============================================================================

/// One active tap-to-trade configuration, as echoed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSession {
    /// Opaque session identifier assigned by the backend
    pub id: String,
    /// Wallet address of the trader
    pub trader: String,
    /// Traded instrument identifier
    pub symbol: String,
    /// Collateral per order, 10^6 base units
    #[serde(with = "string_i64")]
    pub margin_total: i64,
    /// Leverage multiplier (>= 1)
    pub leverage: u32,
    /// Duration of one underlying price bar, seconds
    pub timeframe_secs: i64,
    /// Bars spanned by one grid column
    pub grid_size_x: i64,
    /// Price step per grid row, basis points of the reference price
    pub grid_size_y_bps: i64,
    /// Anchor time, epoch seconds; immutable for the session's lifetime
    pub reference_time: i64,
    /// Anchor price, 10^8 fixed point; immutable
    #[serde(with = "string_i64")]
    pub reference_price: i64,
    /// Whether the session is accepting taps
    pub is_active: bool,
}

impl GridSession {
    /// Time span covered by one grid column, in seconds.
    pub fn column_duration_secs(&self) -> i64 {
        self.grid_size_x * self.timeframe_secs
    }

    /// Price span covered by one grid row, 10^8 fixed point.
    ///
    /// Computed in 128-bit to keep the anchor multiplication exact.
    pub fn price_step(&self) -> i64 {
        ((self.reference_price as i128 * self.grid_size_y_bps as i128)
            / BPS_DENOMINATOR as i128) as i64
    }
}

/// Parameters supplied by the enable action. The grid geometry itself lives
/// on the session manager and is only adjustable while no session is active.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub symbol: String,
    /// Collateral per order, 10^6 base units
    pub margin_total: i64,
    pub leverage: u32,
    pub timeframe_secs: i64,
}

/// Grid geometry: how many bars one column spans and how tall one row is.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    /// Bars per grid column (>= 1)
    pub grid_size_x: i64,
    /// Row height in basis points of the reference price (> 0)
    pub grid_size_y_bps: i64,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            grid_size_x: 1,
            grid_size_y_bps: 50,
        }
    }
}

// =============================================================================
// Backend Wire Types
// =============================================================================

/// Request to register a new session with the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub trader: String,
    pub symbol: String,
    #[serde(with = "string_i64")]
    pub margin_total: i64,
    pub leverage: u32,
    pub timeframe_secs: i64,
    pub grid_size_x: i64,
    pub grid_size_y_bps: i64,
    pub reference_time: i64,
    #[serde(with = "string_i64")]
    pub reference_price: i64,
}

/// Request to cancel an existing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSessionRequest {
    pub session_id: String,
    pub trader: String,
}

/// Batch order submission envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateOrdersRequest {
    pub session_id: String,
    pub orders: Vec<crate::types::OrderIntent>,
}
