//! forge
//!
//! Abstraction for the remote repository host.
//!
//! # Architecture
//!
//! The `Forge` trait is the only way the core reaches the host. Commands use
//! the [`create_forge`] factory rather than importing a specific
//! implementation; tests use [`mock::MockForge`].
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: In-memory implementation for deterministic testing
//! - `factory`: Forge selection and creation
//!
//! # Example
//!
//! ```ignore
//! use brevoza::forge::{create_forge, ForgeProvider, RepoRef};
//!
//! let forge = create_forge(ForgeProvider::GitHub, "https://api.github.com", None)?;
//! let entries = forge
//!     .list_directory(&RepoRef::new("octocat", "site"), "main", "posts")
//!     .await?;
//! ```

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{create_forge, valid_forge_names, ForgeProvider};
pub use traits::*;
