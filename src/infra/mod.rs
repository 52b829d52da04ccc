//! Infrastructure layer
//!
//! Filesystem access for project scaffolding. Lockfile persistence has its
//! own change-aware writer in [`crate::core::lockfile`].

pub mod filesystem;
