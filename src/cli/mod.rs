//! Command-line interface
//!
//! Argument parsing and the choices offered by the interactive menu.

pub mod commands;

pub use commands::{MenuChoice, Opt};
