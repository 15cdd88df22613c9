//! # Relay Node - Peer-to-Peer Transaction Relay
//!
//! Each instance listens for TCP peers, can dial other instances, and keeps
//! an append-only list of transactions that it writes to
//! `transactions_<port>.json` and sends to every connected peer.
//!
//! ## What It Does
//! - **Sessions**: every accepted or dialed socket gets its own reader thread
//! - **Wire format**: one JSON envelope per write, read in chunks of at most
//!   1024 bytes with no reassembly
//! - **Ledger**: in-memory list mirrored to disk after every append
//! - **Relay depth 1**: received transactions are stored, never forwarded
//!
//! There is no consensus, no signing and no deduplication. Two nodes are not
//! guaranteed to end up with the same history.
//!
//! ## Layout
//! - `core/`: the `Transaction` record
//! - `network/`: wire protocol, connections, peer set, node
//! - `storage/`: the file-backed ledger
//! - `wallet/`: wallet address generation
//! - `config/`: bind host, port and ledger location
//! - `cli/`: argument parsing and menu choices for `main.rs`

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod storage;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{MenuChoice, Opt};
pub use config::{ledger_file_name, Config};
pub use crate::core::Transaction;
pub use error::{NodeError, Result};
pub use network::{
    Connection, ConnectionState, Direction, Envelope, Node, PeerInfo, PeerSet, MAX_READ_SIZE,
};
pub use storage::Ledger;
pub use wallet::generate_wallet_address;
