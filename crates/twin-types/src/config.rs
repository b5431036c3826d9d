//! Startup configuration types.
//!
//! `StorageBackend` is resolved once when the process starts and decides
//! which session store implementation gets wired in.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which persistence backend holds conversation logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// One pretty-printed JSON file per session under `dir`.
    Local { dir: PathBuf },
    /// One JSON object per session in an S3 bucket.
    S3 { bucket: String },
}

impl StorageBackend {
    /// Whether object storage (rather than the local filesystem) is active.
    pub fn is_object_storage(&self) -> bool {
        matches!(self, StorageBackend::S3 { .. })
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Local { .. } => "local",
            StorageBackend::S3 { .. } => "s3",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Local { dir } => write!(f, "local ({})", dir.display()),
            StorageBackend::S3 { bucket } => write!(f, "s3 (bucket '{bucket}')"),
        }
    }
}

/// Inference backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedrockConfig {
    pub model_id: String,
    pub region: String,
}
