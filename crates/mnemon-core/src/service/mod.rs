//! Orchestration services invoked by the API layer.

pub mod memory;
pub mod profile;

pub use memory::UserMemoryService;
pub use profile::ProfileService;
