//! Infrastructure implementations for Mnemon.
//!
//! Concrete backends for the trait seams defined in mnemon-core: the SQLite
//! profile repository, the embedded in-process memory store, the HTTP client
//! for an external memory engine, and the configuration loader.

pub mod config;
pub mod memory;
pub mod sqlite;
