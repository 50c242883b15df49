//! gridtap - Grid-addressable tap-to-trade engine
//!
//! Maps a continuously panning/zooming price-time chart viewport onto a
//! stable, session-anchored discrete grid, and turns taps on grid cells
//! into uniquely-nonced, signed order intents without races, even when
//! the user taps faster than the network acknowledges previous orders.
//!
//! The engine consumes a live price/time tick stream, a signing-capable
//! wallet, and a session/order backend. It renders nothing, computes no
//! PnL, and executes no trades.

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use config::Config;
pub use error::{EngineError, Result};
pub use services::{
    GridSessionManager, NonceSequencer, OrderAccumulator, OrderSigner, PriceTick, PriceTicker,
    SessionHandle, ViewportParams, ViewportTransform,
};
pub use sources::{HttpSessionSync, LocalWallet, SessionSync, Wallet};
pub use types::*;
