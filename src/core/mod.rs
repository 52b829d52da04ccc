//! Core business logic for wharf

pub mod canonical;
pub mod deploy;
pub mod init;
pub mod install;
pub mod lockfile;
pub mod manifest;
pub mod project;
pub mod report;
pub mod resolver;
pub mod select;
pub mod workspace;
