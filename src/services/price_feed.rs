//! Price feed plumbing.
//!
//! The engine consumes a live `(timestamp, price)` tick stream. The ticker
//! holds only the most recent observation: it seeds the session anchor at
//! creation time and serves hover/tap resolution in real time.

use std::sync::Mutex;

use futures_util::{Stream, StreamExt};
use tracing::debug;

/// A single price observation: epoch seconds and a 10^8 fixed-point price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTick {
    pub timestamp: i64,
    pub price: i64,
}

/// Latest-tick cache for one instrument.
#[derive(Debug, Default)]
pub struct PriceTicker {
    latest: Mutex<Option<PriceTick>>,
}

impl PriceTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick, replacing the previous one.
    pub fn record(&self, tick: PriceTick) {
        *self.latest.lock().unwrap() = Some(tick);
    }

    /// The most recent tick, if any has arrived yet.
    pub fn latest(&self) -> Option<PriceTick> {
        *self.latest.lock().unwrap()
    }
}

/// Pump a tick stream into the ticker until the stream ends.
pub async fn drive<S>(ticker: &PriceTicker, mut stream: S)
where
    S: Stream<Item = PriceTick> + Unpin,
{
    while let Some(tick) = stream.next().await {
        ticker.record(tick);
    }
    debug!("price stream ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_tick_replaces() {
        let ticker = PriceTicker::new();
        assert!(ticker.latest().is_none());

        ticker.record(PriceTick {
            timestamp: 1,
            price: 100,
        });
        ticker.record(PriceTick {
            timestamp: 2,
            price: 200,
        });
        assert_eq!(ticker.latest().unwrap().price, 200);
    }

    #[tokio::test]
    async fn test_drive_consumes_stream() {
        let ticker = PriceTicker::new();
        let ticks = vec![
            PriceTick {
                timestamp: 10,
                price: 1_000,
            },
            PriceTick {
                timestamp: 11,
                price: 1_100,
            },
        ];
        drive(&ticker, futures_util::stream::iter(ticks)).await;
        assert_eq!(ticker.latest().unwrap().timestamp, 11);
    }
}
