//! SQLite persistence via sqlx.

pub mod pool;
pub mod profile;
