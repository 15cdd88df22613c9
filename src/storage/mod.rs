//! Data storage and persistence
//!
//! The ledger: the node's transaction history, kept in memory and mirrored
//! to a per-node JSON file on every append.

pub mod ledger;

pub use ledger::Ledger;
