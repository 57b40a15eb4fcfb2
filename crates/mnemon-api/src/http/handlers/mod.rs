//! REST API request handlers.

pub mod memory;
pub mod profile;
pub mod task;
