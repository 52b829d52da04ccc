//! Configuration constants
//!
//! File names, marker strings, and default values shared across the crate.

pub mod defaults;
