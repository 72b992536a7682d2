//! HTTP server module.
//!
//! Serves plain HTTP with graceful shutdown on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
