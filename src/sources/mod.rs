pub mod backend;
pub mod wallet;

pub use backend::{HttpSessionSync, SessionSync};
pub use wallet::{LocalWallet, Wallet};
