//! Resource discovery core: per-source caching, aggregation, filtering.
//!
//! # Data Flow
//! ```text
//! source files (JSON/YAML/TOML)
//!     → decoder.rs (extension-keyed decode table)
//!     → lister.rs (per-source snapshot + watermark, mtime-gated refresh)
//!     → provider.rs (ordered aggregation, scoped/aggregate split)
//!     → transport (http/)
//!
//! On each refresh cycle:
//!     scheduler → Lister::refresh
//!     → stat source, skip when mtime unchanged
//!     → decode → atomic swap of Arc<Snapshot>
//!     → readers observe the new list + watermark as one unit
//! ```
//!
//! # Design Decisions
//! - One independently synchronized cache cell per source; refreshes on
//!   different sources never contend
//! - Reads are lock-free and run concurrently with refreshes
//! - Sources are read-only inputs; there is no write path

pub mod decoder;
pub mod filter;
pub mod lister;
pub mod provider;
pub mod types;

pub use lister::{Lister, RefreshError};
pub use provider::{Provider, ProviderError};
pub use types::{Filter, ListRequest, ListResponse, QueryError, Resource};
