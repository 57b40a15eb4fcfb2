//! Service configuration, deserialized from `config.toml`.
//!
//! Every field has a default so a missing or partial file still yields a
//! runnable configuration.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub worker: WorkerConfig,
    pub memory: MemoryBackendConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8321,
        }
    }
}

/// Background worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum number of background tasks executing at once.
    pub max_concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { max_concurrency: 32 }
    }
}

/// Memory engine backend selection.
///
/// With `endpoint` unset the service runs the embedded in-process store;
/// with it set, all memory traffic goes to the external engine at that URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBackendConfig {
    pub endpoint: Option<String>,
    /// Request timeout for the external engine, in seconds.
    pub timeout_secs: u64,
    /// Result cap applied when a retrieval request does not specify one.
    pub default_search_limit: usize,
}

impl Default for MemoryBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 30,
            default_search_limit: 10,
        }
    }
}
