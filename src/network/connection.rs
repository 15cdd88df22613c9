use crate::error::{NodeError, Result};
use crate::network::protocol::{Envelope, MAX_READ_SIZE};
use log::debug;
use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Which side opened the session. Once open both behave the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Lifecycle of a connection.
///
/// The dial phase (`Connecting`) lives inside `Connection::dial`; a value of
/// this type only ever exists `Open` or `Closed`, and `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// One TCP session with a peer.
///
/// Shared between the peer set (sends) and the session's receive loop
/// (reads); `&TcpStream` is both `Read` and `Write`, so no lock is needed.
pub struct Connection {
    id: Uuid,
    direction: Direction,
    remote_addr: Option<SocketAddr>,
    stream: TcpStream,
    alive: AtomicBool,
}

impl Connection {
    pub fn new(stream: TcpStream, direction: Direction) -> Connection {
        let remote_addr = stream.peer_addr().ok();
        Connection {
            id: Uuid::new_v4(),
            direction,
            remote_addr,
            stream,
            alive: AtomicBool::new(true),
        }
    }

    /// Blocking dial with no timeout and no retry
    pub fn dial(host: &str, port: u16) -> Result<Connection> {
        let stream = TcpStream::connect((host, port))
            .map_err(|e| NodeError::Dial(format!("Failed to connect to {host}:{port}: {e}")))?;
        Ok(Connection::new(stream, Direction::Outbound))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ConnectionState {
        if self.is_alive() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Write the encoded envelope with a single `write` call.
    ///
    /// A short write is neither detected nor completed. Any write error
    /// closes the connection.
    pub fn send(&self, envelope: &Envelope) -> Result<()> {
        if !self.is_alive() {
            return Err(NodeError::Send(format!("Connection to {self} is closed")));
        }

        let bytes = envelope.encode()?;
        match (&self.stream).write(&bytes) {
            Ok(written) => {
                debug!("Sent {written} of {} bytes to {self}", bytes.len());
                Ok(())
            }
            Err(e) => {
                self.close();
                Err(NodeError::Send(format!("Failed to send to {self}: {e}")))
            }
        }
    }

    /// One bounded read, decoded as one envelope.
    ///
    /// Three outcomes besides a message: `Ok(None)` is end-of-stream, bytes
    /// that do not decode give `Decode`, and a failed read gives `Io`. The
    /// caller closes the session on all three.
    pub fn receive(&self) -> Result<Option<Envelope>> {
        let mut buf = [0u8; MAX_READ_SIZE];
        let read = loop {
            match (&self.stream).read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(NodeError::Io(format!("Failed to read from {self}: {e}"))),
            }
        };

        if read == 0 {
            return Ok(None);
        }
        Envelope::decode(&buf[..read]).map(Some)
    }

    /// Mark closed and shut the socket down. Returns `false` if it already was.
    pub fn close(&self) -> bool {
        if !self.alive.swap(false, Ordering::SeqCst) {
            return false;
        }
        let _ = self.stream.shutdown(Shutdown::Both);
        true
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remote_addr {
            Some(addr) => write!(f, "{addr}"),
            None => write!(f, "unknown peer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::testnet::connection_pair;
    use std::io::Write;

    #[test]
    fn test_send_and_receive() {
        let (local, remote) = connection_pair();
        let remote = Connection::new(remote, Direction::Inbound);

        let envelope = Envelope::Transaction(Transaction::new("0xa", "0xb", 5.0));
        local.send(&envelope).unwrap();

        assert_eq!(remote.receive().unwrap(), Some(envelope));
        assert_eq!(local.direction(), Direction::Outbound);
        assert_eq!(local.state(), ConnectionState::Open);
    }

    #[test]
    fn test_end_of_stream() {
        let (local, remote) = connection_pair();
        drop(remote);
        assert_eq!(local.receive().unwrap(), None);
    }

    #[test]
    fn test_oversized_message_fails_to_decode() {
        let (local, mut remote) = connection_pair();
        let tx = Transaction::new("0xa", "x".repeat(2 * MAX_READ_SIZE), 1.0);
        let bytes = Envelope::Transaction(tx).encode().unwrap();
        remote.write_all(&bytes).unwrap();

        assert!(matches!(local.receive(), Err(NodeError::Decode(_))));
    }

    #[test]
    fn test_read_failure_is_io_error() {
        let (local, _remote) = connection_pair();
        local
            .stream
            .set_read_timeout(Some(std::time::Duration::from_millis(50)))
            .unwrap();

        assert!(matches!(local.receive(), Err(NodeError::Io(_))));
    }

    #[test]
    fn test_send_after_close_fails() {
        let (local, _remote) = connection_pair();
        assert!(local.close());
        assert!(!local.close());
        assert_eq!(local.state(), ConnectionState::Closed);

        let envelope = Envelope::Other {
            kind: "ping".to_string(),
            data: serde_json::Value::Null,
        };
        assert!(matches!(local.send(&envelope), Err(NodeError::Send(_))));
    }

    #[test]
    fn test_dial_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(matches!(
            Connection::dial("127.0.0.1", port),
            Err(NodeError::Dial(_))
        ));
    }
}
