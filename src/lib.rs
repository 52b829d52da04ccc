//! Wharf - Deployment lockfiles for multi-workspace projects
//!
//! This library resolves workspace dependency graphs against a shared
//! package cache and generates a scoped, portable lockfile for every
//! deployable workspace of a project.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic: project model, resolution, lockfiles
//! - [`cache`] - Read-only package cache access
//! - [`infra`] - Infrastructure layer (filesystem)
//! - [`config`] - Constants and defaults
//! - [`error`] - Error types and handling

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
