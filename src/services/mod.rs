pub mod accumulator;
pub mod nonce;
pub mod price_feed;
pub mod resolver;
pub mod session;
pub mod signer;
pub mod viewport;

pub use accumulator::{OrderAccumulator, PreparedOrder};
pub use nonce::NonceSequencer;
pub use price_feed::{PriceTick, PriceTicker};
pub use session::{GridSessionManager, SessionHandle};
pub use signer::{order_digest, OrderMessage, OrderSigner};
pub use viewport::{ViewportParams, ViewportTransform};
