//! Source file decoding.
//!
//! # Responsibilities
//! - Map a source's file extension to a decode function
//! - Decode file content into the canonical record list
//!
//! # Design Decisions
//! - Table-driven: adding a syntax means adding a row, not branching logic
//!   inside the cache engine
//! - Every syntax decodes the same document shape; the cache is agnostic to
//!   which syntax produced a record list

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::discovery::types::Resource;

/// Errors produced while decoding a source file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported source format {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML decode error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML decode error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Decode function producing the canonical record list for one syntax.
pub type DecodeFn = fn(&str) -> Result<Vec<Resource>, DecodeError>;

/// Document shape shared by every supported syntax.
#[derive(Deserialize)]
struct SourceDocument {
    #[serde(default)]
    resources: Vec<Resource>,
}

fn decode_json(content: &str) -> Result<Vec<Resource>, DecodeError> {
    let document: SourceDocument = serde_json::from_str(content)?;
    Ok(document.resources)
}

fn decode_yaml(content: &str) -> Result<Vec<Resource>, DecodeError> {
    let document: SourceDocument = serde_yaml::from_str(content)?;
    Ok(document.resources)
}

fn decode_toml(content: &str) -> Result<Vec<Resource>, DecodeError> {
    let document: SourceDocument = toml::from_str(content)?;
    Ok(document.resources)
}

/// Extension → decoder table.
const DECODERS: &[(&str, DecodeFn)] = &[
    ("json", decode_json),
    ("yaml", decode_yaml),
    ("yml", decode_yaml),
    ("toml", decode_toml),
];

/// Look up the decoder for a source path by its file extension.
pub fn for_path(path: &Path) -> Result<DecodeFn, DecodeError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    DECODERS
        .iter()
        .find(|&&(ext, _)| ext == extension)
        .map(|&(_, decode)| decode)
        .ok_or(DecodeError::UnsupportedFormat { extension })
}

/// Whether a source path has a decodable extension.
pub fn is_supported(path: &Path) -> bool {
    for_path(path).is_ok()
}
