//! Order intent types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{string_i64, string_u64, CellBounds, CellId};

/// A signed, not-yet-executed order produced by one tap, in backend wire
/// shape: prices and collateral travel as fixed-point decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntent {
    /// Client-side id for log correlation
    pub intent_id: Uuid,
    /// Grid cell the order was placed on
    pub cell_id: CellId,
    pub trader: String,
    pub symbol: String,
    pub is_long: bool,
    /// Collateral, 10^6 base units; one full margin allocation per tap
    #[serde(with = "string_i64")]
    pub collateral: i64,
    pub leverage: u32,
    /// Trigger price, 10^8 fixed point
    #[serde(with = "string_i64")]
    pub trigger_price: i64,
    /// Cell time window, epoch seconds
    pub start_time: i64,
    pub end_time: i64,
    /// Per-trader replay-protection counter
    #[serde(with = "string_u64")]
    pub nonce: u64,
    /// Hex-encoded wallet signature over the canonical order digest
    pub signature: String,
}

/// Outcome of one tap after the asynchronous tail has settled.
#[derive(Debug, Clone)]
pub enum TapOutcome {
    /// Order acknowledged by the backend and recorded on the cell.
    Submitted {
        intent: OrderIntent,
        /// Cell order count after this order
        order_count: u32,
    },
    /// No session was active when the tap arrived; nothing was done.
    Ignored,
    /// The session was cancelled while the order was in flight; the result
    /// was dropped instead of being applied to the fresh state.
    Discarded {
        /// Session the order belonged to
        session_id: String,
    },
}

/// Cell feedback for the hover path (no signing or submission involved).
#[derive(Debug, Clone)]
pub struct HoverInfo {
    pub cell: CellId,
    pub bounds: CellBounds,
    pub is_long: bool,
    /// Orders already accumulated on this cell
    pub order_count: u32,
}
