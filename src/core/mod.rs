//! Core module: configuration, state, server and process-level errors
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared service graph
//! - [`Server`] - HTTP server lifecycle
//! - [`ServerError`] - startup and shutdown failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
