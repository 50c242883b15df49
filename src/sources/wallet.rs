//! Wallet interface.
//!
//! The engine never holds keys. It asks the connected wallet for two things:
//! an off-chain signature over an order digest, and the trader's
//! authoritative nonce counter read against the external ledger.

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::{EngineError, Result};

/// A signing-capable wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Whether a signing-capable wallet is currently connected.
    fn is_connected(&self) -> bool;

    /// The trader address this wallet signs for.
    fn address(&self) -> String;

    /// Request an off-chain signature over a 32-byte digest. The user may
    /// decline the prompt, surfaced as [`EngineError::SignatureDeclined`].
    async fn sign_message(&self, digest: [u8; 32]) -> Result<String>;

    /// Read the trader's authoritative nonce from the external ledger.
    async fn authoritative_nonce(&self, trader: &str) -> Result<u64>;
}

/// In-process ed25519 wallet.
///
/// Signs immediately and serves its nonce counter from memory. Used by tests
/// and development wiring; dashboard hosts plug in their wallet-connect
/// bridge instead.
pub struct LocalWallet {
    key: SigningKey,
    address: String,
    nonce: AtomicU64,
}

impl LocalWallet {
    /// Generate a wallet with a fresh random keypair and a zero nonce.
    pub fn generate() -> Self {
        let key = SigningKey::generate(&mut OsRng);
        let address = format!("0x{}", hex::encode(key.verifying_key().as_bytes()));
        Self {
            key,
            address,
            nonce: AtomicU64::new(0),
        }
    }

    /// Generate a wallet whose authoritative counter starts at `nonce`.
    pub fn with_nonce(nonce: u64) -> Self {
        let wallet = Self::generate();
        wallet.nonce.store(nonce, Ordering::SeqCst);
        wallet
    }
}

#[async_trait]
impl Wallet for LocalWallet {
    fn is_connected(&self) -> bool {
        true
    }

    fn address(&self) -> String {
        self.address.clone()
    }

    async fn sign_message(&self, digest: [u8; 32]) -> Result<String> {
        let signature = self.key.sign(&digest);
        debug!(address = %self.address, "signed order digest locally");
        Ok(format!("0x{}", hex::encode(signature.to_bytes())))
    }

    async fn authoritative_nonce(&self, trader: &str) -> Result<u64> {
        if trader != self.address {
            return Err(EngineError::WalletUnavailable);
        }
        Ok(self.nonce.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_wallet_signs_deterministically() {
        let wallet = LocalWallet::generate();
        let digest = [7u8; 32];
        let a = wallet.sign_message(digest).await.unwrap();
        let b = wallet.sign_message(digest).await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("0x"));
        // 64-byte ed25519 signature, hex-encoded.
        assert_eq!(a.len(), 2 + 128);
    }

    #[tokio::test]
    async fn test_authoritative_nonce_is_per_trader() {
        let wallet = LocalWallet::with_nonce(41);
        let addr = wallet.address();
        assert_eq!(wallet.authoritative_nonce(&addr).await.unwrap(), 41);
        assert!(wallet.authoritative_nonce("0xother").await.is_err());
    }
}
