//! Helpers shared by the unit tests: loopback socket pairs and polling.

pub mod test_utils;

pub use test_utils::*;
