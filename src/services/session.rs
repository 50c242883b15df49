//! Grid session lifecycle.
//!
//! The manager owns exactly one session at a time, moving between Inactive
//! and Active. Activation captures the immutable anchor, registers the
//! session with the backend, and seeds the nonce sequencer from the wallet's
//! authoritative counter. Teardown clears every piece of local state
//! unconditionally, whether or not the backend acknowledged the cancel, so
//! nothing can leak into the next session.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::services::nonce::NonceSequencer;
use crate::services::price_feed::PriceTicker;
use crate::sources::{SessionSync, Wallet};
use crate::types::{
    CellId, CellOrderInfo, CreateSessionRequest, GridGeometry, GridSession, SessionParams,
};

/// State owned exclusively by one active session: the immutable session
/// record, its nonce sequencer, and the per-cell order ledger.
///
/// Handles are shared snapshots: in-flight operations hold one across their
/// asynchronous tail and compare its session id against the manager's
/// current session before applying any result.
#[derive(Debug)]
pub struct SessionHandle {
    session: GridSession,
    nonces: NonceSequencer,
    cells: DashMap<CellId, CellOrderInfo>,
}

impl SessionHandle {
    fn new(session: GridSession, nonces: NonceSequencer) -> Self {
        Self {
            session,
            nonces,
            cells: DashMap::new(),
        }
    }

    pub fn session(&self) -> &GridSession {
        &self.session
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    /// Reserve the next nonce. Synchronous; see [`NonceSequencer`].
    pub fn reserve_nonce(&self) -> u64 {
        self.nonces.reserve()
    }

    /// The value the next reservation would return.
    pub fn next_nonce(&self) -> u64 {
        self.nonces.peek()
    }

    /// Orders accumulated on a cell so far.
    pub fn order_count(&self, cell: &CellId) -> u32 {
        self.cells.get(cell).map(|e| e.order_count).unwrap_or(0)
    }

    /// Snapshot of a cell's accumulator entry.
    pub fn cell_info(&self, cell: &CellId) -> Option<CellOrderInfo> {
        self.cells.get(cell).map(|e| e.value().clone())
    }

    /// Number of cells with at least one order.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Record one acknowledged order on a cell, creating the entry on first
    /// tap. Returns the new count. Strictly additive: counts never decrement
    /// while the session is active.
    pub(crate) fn record_order(
        &self,
        cell: CellId,
        trigger_price: i64,
        start_time: i64,
        end_time: i64,
        is_long: bool,
    ) -> u32 {
        let mut entry = self.cells.entry(cell).or_insert_with(|| CellOrderInfo {
            order_count: 0,
            trigger_price,
            start_time,
            end_time,
            is_long,
        });
        entry.order_count += 1;
        entry.order_count
    }

    pub(crate) fn clear_cells(&self) {
        self.cells.clear();
    }
}

/// Owner of the session lifecycle.
pub struct GridSessionManager {
    backend: Arc<dyn SessionSync>,
    wallet: Arc<dyn Wallet>,
    ticker: Arc<PriceTicker>,
    active: RwLock<Option<Arc<SessionHandle>>>,
    /// Bumped on every lifecycle transition; late results from a superseded
    /// activation are discarded by comparing against it.
    epoch: AtomicU64,
    geometry: Mutex<GridGeometry>,
}

impl GridSessionManager {
    pub fn new(
        backend: Arc<dyn SessionSync>,
        wallet: Arc<dyn Wallet>,
        ticker: Arc<PriceTicker>,
    ) -> Self {
        Self {
            backend,
            wallet,
            ticker,
            active: RwLock::new(None),
            epoch: AtomicU64::new(0),
            geometry: Mutex::new(GridGeometry::default()),
        }
    }

    /// The current session handle, if one is active.
    pub fn active_session(&self) -> Option<Arc<SessionHandle>> {
        self.active.read().unwrap().clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.read().unwrap().is_some()
    }

    pub fn geometry(&self) -> GridGeometry {
        *self.geometry.lock().unwrap()
    }

    /// Set the column width in bars. Only permitted while Inactive.
    pub fn set_grid_size_x(&self, grid_size_x: i64) -> Result<()> {
        if self.is_active() {
            return Err(EngineError::SessionAlreadyActive);
        }
        if grid_size_x < 1 {
            return Err(EngineError::InvalidSessionParameters(format!(
                "grid_size_x must be >= 1, got {grid_size_x}"
            )));
        }
        self.geometry.lock().unwrap().grid_size_x = grid_size_x;
        Ok(())
    }

    /// Set the row height in basis points. Only permitted while Inactive.
    pub fn set_grid_size_y_bps(&self, grid_size_y_bps: i64) -> Result<()> {
        if self.is_active() {
            return Err(EngineError::SessionAlreadyActive);
        }
        if grid_size_y_bps <= 0 {
            return Err(EngineError::InvalidSessionParameters(format!(
                "grid_size_y_bps must be > 0, got {grid_size_y_bps}"
            )));
        }
        self.geometry.lock().unwrap().grid_size_y_bps = grid_size_y_bps;
        Ok(())
    }

    /// Enable tap-to-trade: validate, capture the anchor from the live
    /// ticker, register with the backend, seed nonces, go Active.
    ///
    /// On backend rejection the manager stays Inactive with no local state
    /// mutated.
    pub async fn create_session(&self, params: SessionParams) -> Result<Arc<SessionHandle>> {
        if self.is_active() {
            return Err(EngineError::SessionAlreadyActive);
        }
        if !self.wallet.is_connected() {
            return Err(EngineError::WalletUnavailable);
        }

        let geometry = self.geometry();
        validate(&params, &geometry)?;

        // Anchor capture: one tick, one wall-clock read, both immutable for
        // the session's lifetime.
        let tick = self.ticker.latest().ok_or(EngineError::PriceUnavailable)?;
        let reference_time = chrono::Utc::now().timestamp();
        let reference_price = tick.price;

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let trader = self.wallet.address();

        let req = CreateSessionRequest {
            trader: trader.clone(),
            symbol: params.symbol.clone(),
            margin_total: params.margin_total,
            leverage: params.leverage,
            timeframe_secs: params.timeframe_secs,
            grid_size_x: geometry.grid_size_x,
            grid_size_y_bps: geometry.grid_size_y_bps,
            reference_time,
            reference_price,
        };

        let session = self.backend.create_session(&req).await?;

        // The authoritative counter read races with teardown: if another
        // lifecycle transition landed while we were waiting, this activation
        // is stale and its results must be discarded, not applied.
        let seed = match self.wallet.authoritative_nonce(&trader).await {
            Ok(seed) => seed,
            Err(e) => {
                let _ = self.backend.cancel_session(&session.id, &trader).await;
                return Err(e);
            }
        };
        if self.epoch.load(Ordering::SeqCst) != epoch {
            warn!(session_id = %session.id, "activation superseded, discarding");
            let _ = self.backend.cancel_session(&session.id, &trader).await;
            return Err(EngineError::SessionCreationRejected(
                "superseded during activation".to_string(),
            ));
        }

        let handle = Arc::new(SessionHandle::new(session, NonceSequencer::seeded(seed)));
        *self.active.write().unwrap() = Some(handle.clone());
        info!(
            session_id = %handle.id(),
            symbol = %handle.session().symbol,
            reference_time,
            reference_price,
            first_nonce = seed,
            "grid session active"
        );
        Ok(handle)
    }

    /// Disable tap-to-trade.
    ///
    /// Requests cancellation from the backend, then clears local session
    /// state, the cell ledger, and the nonce sequencer regardless of the
    /// backend outcome. The transition to Inactive is unconditional, and a
    /// backend failure is surfaced only after teardown completes.
    pub async fn cancel_session(&self) -> Result<()> {
        let handle = self.active_session().ok_or(EngineError::NoActiveSession)?;

        let result = self
            .backend
            .cancel_session(handle.id(), &handle.session().trader)
            .await;

        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.active.write().unwrap() = None;
        handle.clear_cells();
        info!(session_id = %handle.id(), "grid session cancelled");

        if let Err(ref e) = result {
            warn!(session_id = %handle.id(), error = %e, "backend cancel failed; local state cleared anyway");
        }
        result
    }
}

fn validate(params: &SessionParams, geometry: &GridGeometry) -> Result<()> {
    if params.symbol.trim().is_empty() {
        return Err(EngineError::InvalidSessionParameters(
            "symbol must not be empty".to_string(),
        ));
    }
    if params.margin_total <= 0 {
        return Err(EngineError::InvalidSessionParameters(format!(
            "margin_total must be > 0, got {}",
            params.margin_total
        )));
    }
    if params.leverage < 1 {
        return Err(EngineError::InvalidSessionParameters(
            "leverage must be >= 1".to_string(),
        ));
    }
    if params.timeframe_secs < 1 {
        return Err(EngineError::InvalidSessionParameters(format!(
            "timeframe_secs must be >= 1, got {}",
            params.timeframe_secs
        )));
    }
    if geometry.grid_size_x < 1 {
        return Err(EngineError::InvalidSessionParameters(format!(
            "grid_size_x must be >= 1, got {}",
            geometry.grid_size_x
        )));
    }
    if geometry.grid_size_y_bps <= 0 {
        return Err(EngineError::InvalidSessionParameters(format!(
            "grid_size_y_bps must be > 0, got {}",
            geometry.grid_size_y_bps
        )));
    }
    Ok(())
}
