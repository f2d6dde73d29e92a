//! # abicodec-observability
//!
//! Structured logging for abicodec.
//!
//! The library crates only emit `tracing` events (interface construction at
//! `debug`, batch summaries at `info`, decode failures at `warn`); this crate
//! owns the subscriber. Logs go to stderr so command output on stdout stays
//! machine-readable.
//!
//! Levels are configurable per component, and `RUST_LOG` overrides the
//! configured directives when it is set.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
