//! Shared domain types for Mnemon.
//!
//! This crate contains the domain types used across the Mnemon service:
//! tracked tasks, action records, user profiles, memory entries, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod action;
pub mod config;
pub mod error;
pub mod memory;
pub mod profile;
pub mod task;
