//! Core data types
//!
//! The only record the node keeps and relays is the `Transaction`.

pub mod transaction;

pub use transaction::Transaction;
