//! Configuration types
//!
//! Board-level sensor wiring, loadable from a TOML board file when the
//! `toml` feature is enabled.

pub mod board;

pub use board::*;
