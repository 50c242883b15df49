//! Nonce sequencing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotone per-session nonce issuer.
///
/// Seeded exactly once, when a session becomes active, from the trader's
/// authoritative on-chain counter. [`reserve`](Self::reserve) is synchronous
/// and must be called before any asynchronous work begins for an order: two
/// taps arriving back-to-back then can never draw the same value, and values
/// are issued in strict tap order even when the signing/submission tails
/// complete out of order.
///
/// There is no release or rollback. A nonce consumed by an order that is
/// later declined or rejected is permanently skipped, and the sequencer is
/// never re-synced against the authoritative counter mid-session, since a
/// re-sync could hand out values colliding with reservations already in
/// flight.
/// Over a long session of many rejections this burns authoritative-counter
/// headroom; the backend tolerates gaps.
#[derive(Debug)]
pub struct NonceSequencer {
    next: AtomicU64,
}

impl NonceSequencer {
    /// Create a sequencer whose first reserved value is `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Hand out the next nonce. Never blocks, never fails.
    pub fn reserve(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The value the next [`reserve`](Self::reserve) call would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reserve_is_strictly_increasing() {
        let nonces = NonceSequencer::seeded(7);
        let issued: Vec<u64> = (0..50).map(|_| nonces.reserve()).collect();
        assert_eq!(issued[0], 7);
        for pair in issued.windows(2) {
            assert!(pair[1] == pair[0] + 1);
        }
        assert_eq!(nonces.peek(), 57);
    }

    #[test]
    fn test_concurrent_reserves_are_unique() {
        let nonces = Arc::new(NonceSequencer::seeded(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let nonces = nonces.clone();
            handles.push(std::thread::spawn(move || {
                (0..100).map(|_| nonces.reserve()).collect::<Vec<u64>>()
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
    }
}
