//! Application layer for Mnemon: HTTP surface and state wiring.
//!
//! Exposed as a library so integration tests can build the router against a
//! throwaway data directory; the `mnemond` binary is a thin CLI over the
//! same pieces.

pub mod http;
pub mod state;
