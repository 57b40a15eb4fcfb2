//! Memory engine boundary types.
//!
//! The semantic memory engine is an external collaborator: Mnemon hands it
//! content to ingest and receives scored candidates back. These types are
//! the wire shapes exchanged at that boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Destination store for memory writes.
///
/// `TASK_STOP` action payloads land in `Tool`; everything else -- ingested
/// conversation content and all other action payloads -- lands in
/// `Profiling`. Retrieval reads the profiling namespace only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryNamespace {
    Profiling,
    Tool,
}

impl fmt::Display for MemoryNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryNamespace::Profiling => write!(f, "profiling"),
            MemoryNamespace::Tool => write!(f, "tool"),
        }
    }
}

impl FromStr for MemoryNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profiling" => Ok(MemoryNamespace::Profiling),
            "tool" => Ok(MemoryNamespace::Tool),
            other => Err(format!("invalid memory namespace: '{other}'")),
        }
    }
}

/// One conversational message submitted for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMessage {
    pub role: String,
    pub content: String,
}

/// A scored candidate entry returned by the memory engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMemory {
    pub id: String,
    /// The stored memory text.
    pub memory: String,
    /// Content hash assigned by the engine.
    pub hash: String,
    /// Relevance score; higher is more relevant. Zero for unscored listings.
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}
