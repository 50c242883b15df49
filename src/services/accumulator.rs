//! Order accumulation.
//!
//! The top-level tap pipeline: resolve the cell, derive trade parameters,
//! reserve a nonce, sign, submit, count. Taps are strictly additive: a
//! second tap on the same cell stacks a second independent full-margin
//! order, it never toggles the first one off.
//!
//! The one ordering rule that everything else hangs off: the nonce is
//! reserved in [`prepare`](OrderAccumulator::prepare), which is synchronous
//! and runs before any await. Rapid taps therefore draw distinct, strictly
//! increasing nonces in tap order, no matter how their signing and
//! submission tails interleave afterwards. Downstream consumers enforce
//! nonce ordering; this engine only guarantees uniqueness and monotonic
//! issuance.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::services::resolver;
use crate::services::session::{GridSessionManager, SessionHandle};
use crate::services::signer::{OrderMessage, OrderSigner};
use crate::services::viewport::ViewportTransform;
use crate::sources::{SessionSync, Wallet};
use crate::types::{CellBounds, CellId, HoverInfo, OrderIntent, TapOutcome};

/// A tap that has passed the guards and holds its reserved nonce, ready for
/// the asynchronous signing/submission tail.
pub struct PreparedOrder {
    handle: Arc<SessionHandle>,
    pub cell: CellId,
    pub bounds: CellBounds,
    pub is_long: bool,
    pub trigger_price: i64,
    pub nonce: u64,
    pub intent_id: Uuid,
}

impl PreparedOrder {
    /// Session this order was prepared under; results are discarded if the
    /// active session no longer matches by the time they land.
    pub fn session_id(&self) -> &str {
        self.handle.id()
    }
}

/// Coordinates taps into signed, submitted, counted order intents.
pub struct OrderAccumulator {
    manager: Arc<GridSessionManager>,
    wallet: Arc<dyn Wallet>,
    backend: Arc<dyn SessionSync>,
    signer: OrderSigner,
    executor_address: String,
}

impl OrderAccumulator {
    pub fn new(
        manager: Arc<GridSessionManager>,
        wallet: Arc<dyn Wallet>,
        backend: Arc<dyn SessionSync>,
        executor_address: impl Into<String>,
    ) -> Self {
        let signer = OrderSigner::new(wallet.clone());
        Self {
            manager,
            wallet,
            backend,
            signer,
            executor_address: executor_address.into(),
        }
    }

    /// Synchronous head of the tap pipeline: guard, derive trade parameters
    /// from the cell, reserve the nonce. No await may happen before this
    /// returns; the reservation here is what keeps rapid taps ordered.
    ///
    /// A missing wallet aborts before the nonce is reserved; a missing
    /// session surfaces as [`EngineError::NoActiveSession`].
    pub fn prepare(&self, cell: CellId) -> Result<PreparedOrder> {
        let handle = self
            .manager
            .active_session()
            .ok_or(EngineError::NoActiveSession)?;
        if !self.wallet.is_connected() {
            return Err(EngineError::WalletUnavailable);
        }

        let bounds = resolver::to_bounds(cell, handle.session())?;
        let is_long = cell.is_long();
        // Trigger at the band edge nearer the anchor: the first boundary the
        // price crosses on its way into the cell.
        let trigger_price = if is_long {
            bounds.price_high
        } else {
            bounds.price_low
        };

        let nonce = handle.reserve_nonce();

        Ok(PreparedOrder {
            handle,
            cell,
            bounds,
            is_long,
            trigger_price,
            nonce,
            intent_id: Uuid::new_v4(),
        })
    }

    /// Asynchronous tail: sign, submit, and apply the count, unless the
    /// session changed while the order was in flight, in which case the
    /// result is dropped rather than applied to freshly reset state.
    ///
    /// A declined signature or failed submission permanently skips the
    /// reserved nonce; there is no rollback.
    pub async fn submit(&self, prepared: PreparedOrder) -> Result<TapOutcome> {
        let session = prepared.handle.session();
        let msg = OrderMessage {
            trader: &session.trader,
            symbol: &session.symbol,
            is_long: prepared.is_long,
            collateral: session.margin_total,
            leverage: session.leverage,
            nonce: prepared.nonce,
            executor: &self.executor_address,
        };

        let signature = match self.signer.sign(&msg).await {
            Ok(sig) => sig,
            Err(e) => {
                warn!(
                    nonce = prepared.nonce,
                    cell = %prepared.cell,
                    error = %e,
                    "order abandoned before submission; nonce skipped"
                );
                return Err(e);
            }
        };

        let intent = OrderIntent {
            intent_id: prepared.intent_id,
            cell_id: prepared.cell,
            trader: session.trader.clone(),
            symbol: session.symbol.clone(),
            is_long: prepared.is_long,
            collateral: session.margin_total,
            leverage: session.leverage,
            trigger_price: prepared.trigger_price,
            start_time: prepared.bounds.start_time,
            end_time: prepared.bounds.end_time,
            nonce: prepared.nonce,
            signature,
        };

        if let Err(e) = self
            .backend
            .batch_create_orders(prepared.session_id(), std::slice::from_ref(&intent))
            .await
        {
            warn!(
                nonce = prepared.nonce,
                cell = %prepared.cell,
                error = %e,
                "order submission failed; nonce skipped"
            );
            return Err(e);
        }

        // Apply gate: only count the order if it still belongs to the
        // active session.
        match self.manager.active_session() {
            Some(current) if current.id() == prepared.session_id() => {
                let order_count = current.record_order(
                    prepared.cell,
                    prepared.trigger_price,
                    prepared.bounds.start_time,
                    prepared.bounds.end_time,
                    prepared.is_long,
                );
                info!(
                    session_id = %prepared.session_id(),
                    cell = %prepared.cell,
                    nonce = prepared.nonce,
                    order_count,
                    is_long = prepared.is_long,
                    "order accumulated"
                );
                Ok(TapOutcome::Submitted {
                    intent,
                    order_count,
                })
            }
            _ => {
                warn!(
                    session_id = %prepared.session_id(),
                    nonce = prepared.nonce,
                    "session cancelled while order in flight; result discarded"
                );
                Ok(TapOutcome::Discarded {
                    session_id: prepared.session_id().to_string(),
                })
            }
        }
    }

    /// Full tap pipeline for a resolved cell. A tap with no active session
    /// is a no-op.
    pub async fn on_tap(&self, cell: CellId) -> Result<TapOutcome> {
        let prepared = match self.prepare(cell) {
            Ok(prepared) => prepared,
            Err(EngineError::NoActiveSession) => {
                debug!(%cell, "tap ignored; no active session");
                return Ok(TapOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };
        self.submit(prepared).await
    }

    /// Full tap pipeline from a pointer event's pixel coordinate.
    pub async fn on_tap_pixel(
        &self,
        transform: &ViewportTransform,
        x: f64,
        y: f64,
    ) -> Result<TapOutcome> {
        let Some(handle) = self.manager.active_session() else {
            debug!("tap ignored; no active session");
            return Ok(TapOutcome::Ignored);
        };
        let (timestamp, price) = transform.pixel_to_point(x, y);
        let cell = resolver::resolve(timestamp, price, handle.session())?;
        self.on_tap(cell).await
    }

    /// Hover resolution: same viewport -> cell path as a tap, without the
    /// signing/submission tail. Returns `None` while no session is active.
    pub fn hover(&self, timestamp_secs: i64, price: i64) -> Result<Option<HoverInfo>> {
        let Some(handle) = self.manager.active_session() else {
            return Ok(None);
        };
        let cell = resolver::resolve(timestamp_secs, price, handle.session())?;
        let bounds = resolver::to_bounds(cell, handle.session())?;
        Ok(Some(HoverInfo {
            cell,
            bounds,
            is_long: cell.is_long(),
            order_count: handle.order_count(&cell),
        }))
    }

    /// Hover resolution from a pixel coordinate.
    pub fn hover_pixel(
        &self,
        transform: &ViewportTransform,
        x: f64,
        y: f64,
    ) -> Result<Option<HoverInfo>> {
        let (timestamp, price) = transform.pixel_to_point(x, y);
        self.hover(timestamp, price)
    }
}
