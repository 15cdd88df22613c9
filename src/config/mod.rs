//! Configuration management
//!
//! Node settings: bind host, listen port and where the ledger file lives.

pub mod settings;

pub use settings::{ledger_file_name, Config, DEFAULT_HOST};
