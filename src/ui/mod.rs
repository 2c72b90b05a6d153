//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output goes through this module so quiet and JSON modes
//! are honoured everywhere. Diagnostics go through `tracing` instead.

pub mod output;
