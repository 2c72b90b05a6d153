//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the [`ContentService`] to execute the command
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Every command except `config` talks to the host and is async. Handlers
//! create a tokio runtime and `block_on` the async implementation.

mod collections;
mod config_cmd;
mod items;
mod moderate;
mod propose;

pub use collections::{collections, schema};
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use items::{items, show};
pub use moderate::{approve, proposals, reject};
pub use propose::{parse_fields, propose};

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::auth::{StaticTokenProvider, TokenProvider};
use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::forge::{create_forge, ForgeProvider};
use crate::service::{ContentService, ServiceOptions};
use crate::ui::output::Verbosity;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub debug: bool,
    pub quiet: bool,
    pub json: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        // JSON output owns stdout.
        Verbosity::from_flags(self.quiet || self.json, self.debug)
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Collections {
            owner,
            repo,
            branch,
        } => collections::collections(ctx, &owner, &repo, branch),
        Command::Schema {
            owner,
            repo,
            collection,
            branch,
        } => collections::schema(ctx, &owner, &repo, &collection, branch),
        Command::Items {
            owner,
            repo,
            collection,
            branch,
            page,
            limit,
            content,
        } => items::items(
            ctx,
            items::ItemsArgs {
                owner,
                repo,
                collection,
                branch,
                page,
                limit,
                content,
            },
        ),
        Command::Show {
            owner,
            repo,
            path,
            branch,
        } => items::show(ctx, &owner, &repo, &path, branch),
        Command::Propose {
            owner,
            repo,
            collection,
            fields,
            path,
            base,
            branch_name,
        } => propose::propose(
            ctx,
            propose::ProposeArgs {
                owner,
                repo,
                collection,
                fields,
                path,
                base,
                branch_name,
            },
        ),
        Command::Proposals { owner, repo, state } => {
            moderate::proposals(ctx, &owner, &repo, state.into())
        }
        Command::Approve {
            owner,
            repo,
            number,
        } => moderate::approve(ctx, &owner, &repo, number),
        Command::Reject {
            owner,
            repo,
            number,
        } => moderate::reject(ctx, &owner, &repo, number),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
    }
}

/// Load the user configuration.
pub(crate) fn load_config() -> Result<Config> {
    let config = Config::load().context("Failed to load config")?;
    if let Some(path) = config.loaded_from() {
        debug!(path = %path.display(), "loaded config");
    }
    Ok(config)
}

/// Build the content service described by `config`.
///
/// Without a token in the environment the forge runs anonymously, which is
/// enough for reading public repositories.
pub(crate) fn build_service(config: &Config) -> Result<ContentService> {
    let provider = ForgeProvider::resolve(config.forge())?;
    let token = StaticTokenProvider::from_env(provider.name())
        .map(|p| Arc::new(p) as Arc<dyn TokenProvider>);
    if token.is_none() {
        debug!("no token in environment, using anonymous access");
    }

    let forge = create_forge(provider, config.api_base(), token)?;
    let options = ServiceOptions {
        root_config_path: config.root_config_path().to_string(),
        fetch_concurrency: config.fetch_concurrency(),
    };
    Ok(ContentService::with_options(forge, options))
}

/// Configured default branch unless one was given.
pub(crate) fn branch_or_default(branch: Option<String>, config: &Config) -> String {
    branch.unwrap_or_else(|| config.default_branch().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::schema::ConfigFile;

    #[test]
    fn json_mode_silences_messages() {
        let ctx = Context {
            json: true,
            ..Default::default()
        };
        assert_eq!(ctx.verbosity(), Verbosity::Quiet);
        assert_eq!(Context::default().verbosity(), Verbosity::Normal);
    }

    #[test]
    fn branch_defaults_to_config() {
        let config = Config::from_file(ConfigFile {
            default_branch: Some("develop".into()),
            ..Default::default()
        });
        assert_eq!(branch_or_default(None, &config), "develop");
        assert_eq!(branch_or_default(Some("x".into()), &config), "x");
    }

    #[test]
    fn service_uses_config_options() {
        let config = Config::from_file(ConfigFile {
            root_config_path: Some("cms.yml".into()),
            ..Default::default()
        });
        let service = build_service(&config).unwrap();
        assert_eq!(service.options().root_config_path, "cms.yml");
        assert_eq!(service.options().fetch_concurrency, 8);
    }
}
