//! Business logic for the Mnemon user-memory service.
//!
//! This crate owns the task lifecycle (registry + bounded runner), the
//! action dispatcher, the profile service, and the orchestration layer over
//! the external memory engine. Infrastructure implementations of the trait
//! seams ([`memory::store::MemoryStore`], [`profile::ProfileRepository`])
//! live in mnemon-infra; core never depends on infra.

pub mod action;
pub mod memory;
pub mod profile;
pub mod service;
pub mod task;
