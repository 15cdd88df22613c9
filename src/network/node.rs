use crate::config::Config;
use crate::core::Transaction;
use crate::error::{NodeError, Result};
use crate::network::connection::{Connection, Direction};
use crate::network::peer_set::{PeerInfo, PeerSet};
use crate::network::protocol::Envelope;
use crate::storage::Ledger;
use crate::wallet::generate_wallet_address;
use log::{error, info, warn};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::thread;

/// A relay node: one listener, one receive loop per peer, one ledger.
///
/// Received transactions are stored but never forwarded, so a transaction
/// travels exactly one hop from the node that created it.
pub struct Node {
    config: Config,
    wallet_address: String,
    peers: Arc<PeerSet>,
    ledger: Arc<Ledger>,
    local_addr: OnceLock<SocketAddr>,
}

impl Node {
    pub fn new(config: Config) -> Node {
        let ledger = Arc::new(Ledger::new(config.ledger_path()));
        Node {
            config,
            wallet_address: generate_wallet_address(),
            peers: Arc::new(PeerSet::new()),
            ledger,
            local_addr: OnceLock::new(),
        }
    }

    /// Bind, load the ledger, then hand the listener to the accept loop.
    ///
    /// Returns the bound address as soon as the accept loop is running. A
    /// `Config`, `Listen` or `Load` error means nothing was started. A node
    /// starts at most once; reloading would drop appends the file never got.
    pub fn start(&self) -> Result<SocketAddr> {
        if let Some(addr) = self.local_addr() {
            return Err(NodeError::Listen(format!("Node already listening on {addr}")));
        }
        self.config.validate()?;

        let node_addr = self.config.get_node_addr();
        let listener = TcpListener::bind((self.config.get_host(), self.config.get_port()))
            .map_err(|e| NodeError::Listen(format!("Failed to bind to {node_addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| NodeError::Listen(format!("Failed to bind to {node_addr}: {e}")))?;

        info!("Node listening on {local_addr}");
        info!("Your wallet address is: {}", self.wallet_address);

        self.ledger.load()?;

        let peers = Arc::clone(&self.peers);
        let ledger = Arc::clone(&self.ledger);
        thread::Builder::new()
            .name("accept-loop".to_string())
            .spawn(move || Self::accept_loop(listener, peers, ledger))
            .map_err(|e| NodeError::Listen(format!("Failed to start accept loop: {e}")))?;

        let _ = self.local_addr.set(local_addr);
        Ok(local_addr)
    }

    /// Dial a peer and run a session for it exactly like an accepted one.
    ///
    /// On failure the peer set is left as it was; there is no retry.
    pub fn connect_to_peer(&self, host: &str, port: u16) -> Result<PeerInfo> {
        let connection = Arc::new(Connection::dial(host, port)?);
        info!("Connected to peer {host}:{port}");

        let info = PeerInfo {
            id: connection.id(),
            remote_addr: connection.remote_addr(),
            direction: connection.direction(),
        };
        Self::spawn_session(&self.peers, &self.ledger, connection)?;
        Ok(info)
    }

    /// Apply one inbound message. Never broadcasts anything.
    pub fn process_message(&self, envelope: Envelope) -> Result<()> {
        Self::dispatch(&self.ledger, envelope)
    }

    /// Record a transaction from this node's wallet, then send it to every peer.
    ///
    /// If persisting fails the error is returned before anything is sent, and
    /// the transaction remains in the in-memory ledger.
    pub fn create_transaction(&self, recipient: &str, amount: f64) -> Result<Transaction> {
        let tx = Transaction::new(self.wallet_address.as_str(), recipient, amount);
        self.ledger.append_and_persist(tx.clone())?;
        info!("Transaction added and saved: {tx}");

        let delivered = self.broadcast(&Envelope::Transaction(tx.clone()))?;
        info!("Transaction broadcast to {delivered} peer(s)");
        Ok(tx)
    }

    /// Send `envelope` to every peer; peers that fail are dropped.
    pub fn broadcast(&self, envelope: &Envelope) -> Result<usize> {
        self.peers.for_each(|connection| connection.send(envelope))
    }

    pub fn wallet_address(&self) -> &str {
        self.wallet_address.as_str()
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.ledger.transactions()
    }

    pub fn peers(&self) -> Result<Vec<PeerInfo>> {
        self.peers.peers()
    }

    pub fn peer_count(&self) -> Result<usize> {
        self.peers.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger_path(&self) -> &Path {
        self.ledger.path()
    }

    /// Set once `start()` has bound the listener
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    fn accept_loop(listener: TcpListener, peers: Arc<PeerSet>, ledger: Arc<Ledger>) {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("Accept loop stopped: {e}");
                    return;
                }
            };

            let connection = Arc::new(Connection::new(stream, Direction::Inbound));
            info!("New connection from {connection}");

            if let Err(e) = Self::spawn_session(&peers, &ledger, connection) {
                error!("Failed to start session: {e}");
            }
        }
    }

    /// Register `connection` and start its receive loop
    fn spawn_session(
        peers: &Arc<PeerSet>,
        ledger: &Arc<Ledger>,
        connection: Arc<Connection>,
    ) -> Result<()> {
        peers.add(Arc::clone(&connection))?;

        let session_peers = Arc::clone(peers);
        let session_ledger = Arc::clone(ledger);
        let session_connection = Arc::clone(&connection);
        let spawned = thread::Builder::new()
            .name(format!("peer-{connection}"))
            .spawn(move || Self::receive_loop(session_peers, session_ledger, session_connection));

        if let Err(e) = spawned {
            connection.close();
            peers.remove(connection.id())?;
            return Err(NodeError::Network(format!(
                "Failed to start receive loop for {connection}: {e}"
            )));
        }
        Ok(())
    }

    /// Read until end-of-stream or the first error, then close and deregister.
    fn receive_loop(peers: Arc<PeerSet>, ledger: Arc<Ledger>, connection: Arc<Connection>) {
        loop {
            let envelope = match connection.receive() {
                Ok(Some(envelope)) => envelope,
                Ok(None) => {
                    info!("Connection to {connection} closed");
                    break;
                }
                Err(e) => {
                    warn!("Error handling peer {connection}: {e}");
                    break;
                }
            };

            if let Err(e) = Self::dispatch(&ledger, envelope) {
                error!("Error processing message from {connection}: {e}");
                break;
            }
        }

        connection.close();
        if let Err(e) = peers.remove(connection.id()) {
            warn!("Failed to remove peer {connection}: {e}");
        }
    }

    fn dispatch(ledger: &Ledger, envelope: Envelope) -> Result<()> {
        match envelope {
            Envelope::Transaction(tx) => {
                info!("Received transaction: {tx}");
                ledger.append_and_persist(tx.clone())?;
                info!("Transaction added and saved: {tx}");
            }
            Envelope::Other { kind, data } => {
                info!("Received message of type '{kind}': {data}");
            }
        }
        Ok(())
    }
}
