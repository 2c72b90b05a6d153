//! core
//!
//! Shared domain types, the error taxonomy, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, RepoPath
//! - [`error`] - `CoreError` and its stable `ErrorKind`
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod error;
pub mod types;

pub use error::{CoreError, ErrorKind};
