//! Order signing.
//!
//! One order authorization is a canonical byte message (fixed field order,
//! length-prefixed strings, big-endian fixed-width integers) hashed with
//! SHA-256 and signed off-chain by the wallet. The backend and the chain
//! re-derive the digest from the same fields, so the layout here is part of
//! the wire contract and must stay byte-stable.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::Result;
use crate::sources::Wallet;

/// The fields covered by one order signature, in canonical order.
#[derive(Debug, Clone, Copy)]
pub struct OrderMessage<'a> {
    pub trader: &'a str,
    pub symbol: &'a str,
    pub is_long: bool,
    /// Collateral, 10^6 base units
    pub collateral: i64,
    pub leverage: u32,
    pub nonce: u64,
    /// Executor contract authorized to consume this order
    pub executor: &'a str,
}

/// Canonical SHA-256 digest of an order message.
pub fn order_digest(msg: &OrderMessage<'_>) -> [u8; 32] {
    let mut bytes = Vec::with_capacity(
        msg.trader.len() + msg.symbol.len() + msg.executor.len() + 3 * 4 + 1 + 8 + 4 + 8,
    );
    push_str(&mut bytes, msg.trader);
    push_str(&mut bytes, msg.symbol);
    bytes.push(msg.is_long as u8);
    bytes.extend_from_slice(&(msg.collateral as u64).to_be_bytes());
    bytes.extend_from_slice(&msg.leverage.to_be_bytes());
    bytes.extend_from_slice(&msg.nonce.to_be_bytes());
    push_str(&mut bytes, msg.executor);

    Sha256::digest(&bytes).into()
}

/// Length-prefixed UTF-8: variable-length fields cannot be allowed to bleed
/// into their neighbors.
fn push_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Builds the canonical message for one order and obtains the authorizing
/// signature from the wallet.
pub struct OrderSigner {
    wallet: Arc<dyn Wallet>,
}

impl OrderSigner {
    pub fn new(wallet: Arc<dyn Wallet>) -> Self {
        Self { wallet }
    }

    /// Hash the message and request the wallet signature. Asynchronous; the
    /// user may decline the prompt.
    pub async fn sign(&self, msg: &OrderMessage<'_>) -> Result<String> {
        self.wallet.sign_message(order_digest(msg)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OrderMessage<'static> {
        OrderMessage {
            trader: "0xtrader",
            symbol: "BTC-USD",
            is_long: false,
            collateral: 25_000_000,
            leverage: 10,
            nonce: 3,
            executor: "0xexecutor",
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(order_digest(&message()), order_digest(&message()));
    }

    #[test]
    fn test_digest_covers_every_field() {
        let base = order_digest(&message());

        let mut m = message();
        m.nonce = 4;
        assert_ne!(order_digest(&m), base);

        let mut m = message();
        m.is_long = true;
        assert_ne!(order_digest(&m), base);

        let mut m = message();
        m.collateral = 25_000_001;
        assert_ne!(order_digest(&m), base);

        let mut m = message();
        m.executor = "0xother";
        assert_ne!(order_digest(&m), base);
    }

    #[test]
    fn test_length_prefix_prevents_field_bleed() {
        // "ab" + "c" must not collide with "a" + "bc".
        let a = order_digest(&OrderMessage {
            trader: "ab",
            symbol: "c",
            ..message()
        });
        let b = order_digest(&OrderMessage {
            trader: "a",
            symbol: "bc",
            ..message()
        });
        assert_ne!(a, b);
    }
}
