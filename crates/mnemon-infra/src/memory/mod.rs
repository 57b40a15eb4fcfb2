//! Memory engine backends.
//!
//! Two implementations of `mnemon_core::memory::MemoryStore`:
//! [`embedded::EmbeddedMemoryStore`] runs in-process (the default), and
//! [`client::HttpMemoryStore`] proxies to an external engine over HTTP.

pub mod client;
pub mod embedded;

pub use client::HttpMemoryStore;
pub use embedded::EmbeddedMemoryStore;
