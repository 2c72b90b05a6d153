//! Brevoza - propose and moderate repository-backed content
//!
//! Brevoza lets editors browse structured content stored as files in a
//! hosted repository and propose new items without touching the repository
//! directly. Every proposal becomes a branch, a commit, and a pull request;
//! moderators approve (merge) or reject (close) it.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to service)
//! - [`service`] - The core boundary: request/response shapes and error kinds
//! - [`content`] - Read path: collections, schemas, item resolution, fetching
//! - [`proposal`] - Write path: proposal creation and moderation
//! - [`core`] - Domain types, errors, and user configuration
//! - [`forge`] - Abstraction over the repository host (GitHub)
//! - [`auth`] - Bearer token supply for the forge
//! - [`ui`] - User-facing output
//!
//! # Guarantees
//!
//! 1. Every read recomputes collections, schemas, and listings from the host
//! 2. A failed item fetch is reported on the item, never as a failed listing
//! 3. Proposals only ever create files; existing files are never overwritten
//! 4. Every failure carries a stable [`core::ErrorKind`]

pub mod auth;
pub mod cli;
pub mod content;
pub mod core;
pub mod forge;
pub mod proposal;
pub mod service;
pub mod ui;
