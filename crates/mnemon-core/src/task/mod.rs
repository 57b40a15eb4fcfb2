//! Asynchronous task lifecycle: registry and bounded runner.

pub mod registry;
pub mod runner;

pub use registry::TaskRegistry;
pub use runner::TaskRunner;
