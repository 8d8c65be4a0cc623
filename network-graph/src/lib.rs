//! # Network Graph
//!
//! Service that builds a live graph of which peers talk to which from the
//! firehose, and serves it over HTTP.
//!
//! ## Modules
//!
//! - [`config`]: Configuration read from the environment
//! - [`server`]: HTTP routes for the JSON and DOT encodings
//! - [`runner`]: Runs the ingestor and server as one process group
//! - [`errors`]: Error types for the service

pub mod config;
pub mod errors;
pub mod runner;
pub mod server;

pub use config::Config;
pub use errors::AppError;
