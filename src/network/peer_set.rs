use crate::error::{NodeError, Result};
use crate::network::connection::{Connection, Direction};
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Snapshot of one peer for display
#[derive(Debug, Clone, PartialEq)]
pub struct PeerInfo {
    pub id: Uuid,
    pub remote_addr: Option<SocketAddr>,
    pub direction: Direction,
}

/// The live connections of one node.
///
/// Every connection held here has a receive loop running for it.
pub struct PeerSet {
    inner: RwLock<Vec<Arc<Connection>>>,
}

impl Default for PeerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerSet {
    pub fn new() -> PeerSet {
        PeerSet {
            inner: RwLock::new(vec![]),
        }
    }

    pub fn add(&self, connection: Arc<Connection>) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| NodeError::Network(format!("Failed to acquire peer lock: {e}")))?;
        info!("Peer {connection} added ({:?})", connection.direction());
        inner.push(connection);
        Ok(())
    }

    /// Remove the connection with `id`. Removing an absent id is a no-op.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| NodeError::Network(format!("Failed to acquire peer lock: {e}")))?;
        if let Some(idx) = inner.iter().position(|c| c.id() == id) {
            let connection = inner.remove(idx);
            info!("Peer {connection} removed");
            return Ok(true);
        }
        Ok(false)
    }

    /// Run `f` on every connection in a snapshot of the set.
    ///
    /// A connection for which `f` fails is closed and removed; the remaining
    /// connections are still visited. Returns how many calls succeeded.
    pub fn for_each<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(&Connection) -> Result<()>,
    {
        let mut delivered = 0;
        for connection in self.snapshot()? {
            match f(connection.as_ref()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Error broadcasting to peer {connection}: {e}");
                    connection.close();
                    self.remove(connection.id())?;
                }
            }
        }
        Ok(delivered)
    }

    pub fn snapshot(&self) -> Result<Vec<Arc<Connection>>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| NodeError::Network(format!("Failed to acquire peer lock: {e}")))?;
        Ok(inner.clone())
    }

    pub fn peers(&self) -> Result<Vec<PeerInfo>> {
        Ok(self
            .snapshot()?
            .iter()
            .map(|c| PeerInfo {
                id: c.id(),
                remote_addr: c.remote_addr(),
                direction: c.direction(),
            })
            .collect())
    }

    pub fn contains(&self, id: Uuid) -> Result<bool> {
        Ok(self.snapshot()?.iter().any(|c| c.id() == id))
    }

    pub fn len(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|e| NodeError::Network(format!("Failed to acquire peer lock: {e}")))?;
        Ok(inner.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
