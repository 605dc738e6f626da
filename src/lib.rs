//! File-backed resource discovery cache.
//!
//! Serves a dynamically changing set of labeled network targets (name, IP,
//! port, labels) decoded from on-disk source files. Each source is cached
//! and refreshed on its own cadence, gated by file modification time, so
//! polling clients never trigger a re-parse; they query with filters and an
//! if-modified-since watermark instead.

pub mod config;
pub mod discovery;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod scheduler;

pub use config::DiscoveryConfig;
pub use discovery::{Lister, Provider};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
