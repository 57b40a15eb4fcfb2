//! Memory engine seam: the trait the external collaborator sits behind.

pub mod box_store;
pub mod store;

pub use box_store::BoxMemoryStore;
pub use store::MemoryStore;
