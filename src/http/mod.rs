//! HTTP transport surface.
//!
//! The discovery core defines no wire protocol of its own; this module
//! embeds it behind a small JSON-over-HTTP surface:
//!
//! - `POST /v1/resources`: query, body is a `ListRequest`
//! - `GET /healthz`: liveness

pub mod server;

pub use server::HttpServer;
