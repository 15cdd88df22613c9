//! Wallet address generation
//!
//! A node's wallet address is just an identifier stamped on the
//! transactions it creates.

pub mod address;

pub use address::{generate_wallet_address, WALLET_ADDRESS_BYTES, WALLET_ADDRESS_PREFIX};
