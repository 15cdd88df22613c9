use crate::core::Transaction;
use crate::error::{NodeError, Result};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Append-only transaction history backed by one JSON file.
///
/// The lock covers both the in-memory sequence and the file write, so two
/// appends can never interleave their writes.
pub struct Ledger {
    path: PathBuf,
    transactions: Mutex<Vec<Transaction>>,
}

impl Ledger {
    /// An empty ledger bound to `path`. Nothing is read or written yet.
    pub fn new(path: impl AsRef<Path>) -> Ledger {
        Ledger {
            path: path.as_ref().to_path_buf(),
            transactions: Mutex::new(vec![]),
        }
    }

    /// Construct and `load()` in one step
    pub fn open(path: impl AsRef<Path>) -> Result<Ledger> {
        let ledger = Ledger::new(path);
        ledger.load()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Replace the in-memory sequence with the file contents.
    ///
    /// A missing file means an empty ledger. A file that exists but does not
    /// hold a JSON array of transactions is a `Load` error and leaves the
    /// in-memory sequence untouched.
    pub fn load(&self) -> Result<usize> {
        let mut transactions = self.lock()?;
        if !self.path.exists() {
            transactions.clear();
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            NodeError::Load(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        let loaded: Vec<Transaction> = serde_json::from_str(&content).map_err(|e| {
            NodeError::Load(format!("Malformed ledger {}: {e}", self.path.display()))
        })?;

        *transactions = loaded;
        info!("Loaded {} transactions from file.", transactions.len());
        Ok(transactions.len())
    }

    /// Append `tx` and rewrite the whole file.
    ///
    /// If the write fails the transaction stays in memory and the caller gets
    /// a `Persist` error; the ledger is then ahead of its file until the next
    /// successful append.
    pub fn append_and_persist(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.lock()?;
        transactions.push(tx);
        self.persist(&transactions)
            .map_err(|e| NodeError::Persist(format!("{}: {e}", self.path.display())))
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn persist(&self, transactions: &[Transaction]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, transactions)?;
        writer.flush()?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Transaction>>> {
        self.transactions
            .lock()
            .map_err(|e| NodeError::Network(format!("Failed to acquire ledger lock: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn read_back(path: &Path) -> Vec<Transaction> {
        let content = fs::read_to_string(path).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path().join("transactions_5000.json")).unwrap();
        assert!(ledger.is_empty().unwrap());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn test_file_matches_memory_after_each_append() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("transactions_5000.json"));

        let txs = vec![
            Transaction::new("0xa", "0xb", 1.0),
            Transaction::new("0xa", "0xc", 2.5),
            Transaction::new("0xa", "0xb", 1.0),
        ];
        for tx in &txs {
            ledger.append_and_persist(tx.clone()).unwrap();
            assert_eq!(read_back(ledger.path()), ledger.transactions().unwrap());
        }
        assert_eq!(read_back(ledger.path()), txs);
    }

    #[test]
    fn test_reload_reproduces_persisted_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions_5000.json");

        let first = Ledger::new(&path);
        first
            .append_and_persist(Transaction::new("0xa", "0xb", 3.0))
            .unwrap();
        first
            .append_and_persist(Transaction::new("0xb", "0xa", 4.0))
            .unwrap();

        let second = Ledger::open(&path).unwrap();
        let third = Ledger::open(&path).unwrap();
        assert_eq!(second.transactions().unwrap(), first.transactions().unwrap());
        assert_eq!(second.transactions().unwrap(), third.transactions().unwrap());
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions_5000.json");
        fs::write(&path, "{not json").unwrap();

        match Ledger::open(&path) {
            Err(NodeError::Load(_)) => {}
            other => panic!("expected load error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_persist_failure_keeps_memory_append() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("missing").join("transactions_5000.json"));

        let result = ledger.append_and_persist(Transaction::new("0xa", "0xb", 1.0));
        assert!(matches!(result, Err(NodeError::Persist(_))));
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_appends_all_reach_file() {
        let dir = tempdir().unwrap();
        let ledger = Arc::new(Ledger::new(dir.path().join("transactions_5000.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for j in 0..10 {
                        let tx = Transaction::new(format!("0x{i}"), "0xr", j as f64);
                        ledger.append_and_persist(tx).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let on_disk = read_back(ledger.path());
        assert_eq!(on_disk.len(), 80);
        assert_eq!(on_disk, ledger.transactions().unwrap());
    }
}
