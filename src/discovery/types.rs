//! Discovery data model and query shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A discovered network target.
///
/// Freshness is not tracked per record; the watermark belongs to the source
/// that produced the record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Target name, unique within its source.
    pub name: String,

    /// IP address, kept as the string the source declared.
    pub ip: String,

    /// Target port.
    pub port: u16,

    /// Free-form labels attached to the target.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// A key/value predicate narrowing a query.
///
/// The value is a regular expression with full-match semantics. A request
/// carries an ordered list of filters, AND-combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub value: String,
}

/// A resource query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRequest {
    /// Scope the query to a single configured source path.
    pub resource_path: Option<String>,

    /// Predicates to apply, AND-combined. Empty matches everything.
    pub filters: Vec<Filter>,

    /// Unix-seconds watermark; data at or before this instant is not re-sent.
    /// Zero or absent means unconditional.
    pub if_modified_since: Option<i64>,
}

/// A query result: matching records plus the watermark they are valid as of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Matching records, in source order (aggregate queries: configured-path
    /// order, then per-source order).
    pub resources: Vec<Resource>,

    /// Watermark of the served snapshot. An empty `resources` alongside a
    /// watermark the caller already holds is a cache-valid signal, not an
    /// error.
    pub last_modified: i64,
}

/// Errors a query can fail with. All other query outcomes are data, not
/// errors; an empty result is valid.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Scoped request named a path no lister serves.
    #[error("no source configured for resource path {path:?}")]
    NotFound { path: String },

    /// A filter's value failed to compile as a regular expression. The whole
    /// query fails; no partial result is returned.
    #[error("invalid filter pattern for key {key:?}: {source}")]
    InvalidFilter {
        key: String,
        #[source]
        source: regex::Error,
    },
}
