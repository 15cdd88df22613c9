//! Peer-to-peer networking
//!
//! Wire protocol, TCP sessions, the shared peer set and the node that ties
//! them to the ledger. One OS thread accepts connections and one thread per
//! peer reads from it.

pub mod connection;
pub mod node;
pub mod peer_set;
pub mod protocol;

pub use connection::{Connection, ConnectionState, Direction};
pub use node::Node;
pub use peer_set::{PeerInfo, PeerSet};
pub use protocol::{Envelope, MAX_READ_SIZE, TRANSACTION_TYPE};
