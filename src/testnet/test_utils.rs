//! Test utilities for network testing

use crate::network::{Connection, Direction};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

/// A dialed `Connection` plus the raw socket accepted on the other end
pub fn connection_pair() -> (Connection, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let local = TcpStream::connect(addr).unwrap();
    let (remote, _) = listener.accept().unwrap();
    (Connection::new(local, Direction::Outbound), remote)
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_pair_is_connected() {
        let (local, remote) = connection_pair();
        assert_eq!(local.remote_addr(), remote.local_addr().ok());
    }

    #[test]
    fn test_wait_until_times_out() {
        assert!(!wait_until(Duration::from_millis(30), || false));
        assert!(wait_until(Duration::from_millis(30), || true));
    }
}
