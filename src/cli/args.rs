//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand, ValueEnum};

use crate::forge::PrStateFilter;

/// Brevoza - propose and moderate repository-backed content
#[derive(Parser, Debug)]
#[command(name = "brevoza")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    // ========== Read ==========
    /// List the collections declared by a repository
    #[command(
        name = "collections",
        long_about = "List the collections declared by a repository.\n\n\
            Reads the root configuration document (brevoza.config.yml by default) \
            and the schema file of every collection, and shows each collection's \
            fields and storage layout.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Collections on the default branch
    brevoza collections octocat site

    # Collections on another branch, as JSON
    brevoza collections octocat site --branch develop --json"
    )]
    Collections {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Branch to read (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
    },

    /// Show the schema of one collection
    #[command(
        name = "schema",
        long_about = "Show the fields and storage layout of one collection.\n\n\
            Required fields that the schema never declares are listed separately.",
        after_help = "\
WORKFLOW EXAMPLES:
    brevoza schema octocat site posts
    brevoza schema octocat site posts --json"
    )]
    Schema {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Collection name
        collection: String,
        /// Branch to read (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
    },

    /// List the items of a collection
    #[command(
        name = "items",
        long_about = "List the items of a collection, one page at a time.\n\n\
            The items directory is located from the collection's schema and a fixed \
            list of conventional directories. Every item is resolved before the \
            requested page is cut out of the full list.",
        after_help = "\
WORKFLOW EXAMPLES:
    # First page of posts
    brevoza items octocat site posts

    # Second page of ten, with file contents
    brevoza items octocat site posts --page 2 --limit 10 --content"
    )]
    Items {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Collection name
        collection: String,
        /// Branch to read (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Items per page (defaults to the configured list limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Fetch the content of every item
        #[arg(long)]
        content: bool,
    },

    /// Print the content of one file
    #[command(name = "show")]
    Show {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Repository-relative file path
        path: String,
        /// Branch to read (defaults to the configured default branch)
        #[arg(long)]
        branch: Option<String>,
    },

    // ========== Write ==========
    /// Propose a new item through a pull request
    #[command(
        name = "propose",
        long_about = "Propose a new item through a pull request.\n\n\
            Creates a branch from the base branch, commits the item file to it, and \
            opens a pull request back into the base branch. Nothing is cleaned up \
            if a later step fails; the branch is reported so it can be deleted.",
        after_help = "\
WORKFLOW EXAMPLES:
    # File path derived from the collection's storage settings
    brevoza propose octocat site posts --field id=hello --field title='Hello'

    # Explicit path and branch
    brevoza propose octocat site posts --field id=hello \\
        --path content/posts/hello.json --branch-name add-hello"
    )]
    Propose {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Collection name
        collection: String,
        /// Item field as key=value (repeatable)
        #[arg(long = "field", value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
        /// Target file path (defaults to the collection's storage path)
        #[arg(long)]
        path: Option<String>,
        /// Base branch (defaults to the configured default branch)
        #[arg(long)]
        base: Option<String>,
        /// Proposal branch name (defaults to add-<collection>-item-<millis>)
        #[arg(long)]
        branch_name: Option<String>,
    },

    // ========== Moderation ==========
    /// List proposals (pull requests)
    #[command(name = "proposals")]
    Proposals {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Which proposals to list
        #[arg(long, value_enum, default_value_t = StateArg::Open)]
        state: StateArg,
    },

    /// Approve a proposal by merging it
    #[command(name = "approve")]
    Approve {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Pull request number
        number: u64,
    },

    /// Reject a proposal by closing it
    #[command(
        name = "reject",
        long_about = "Reject a proposal by closing its pull request without merging.\n\n\
            The pull request can still be reopened on the host by hand."
    )]
    Reject {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Pull request number
        number: u64,
    },

    // ========== Configuration ==========
    /// Get, set, or list configuration values
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Proposal state filter.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateArg {
    Open,
    Closed,
    All,
}

impl From<StateArg> for PrStateFilter {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Open => PrStateFilter::Open,
            StateArg::Closed => PrStateFilter::Closed,
            StateArg::All => PrStateFilter::All,
        }
    }
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_items_flags() {
        let cli = Cli::try_parse_from([
            "brevoza", "--json", "items", "octocat", "site", "posts", "--page", "2", "--content",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Items {
                collection,
                page,
                limit,
                content,
                ..
            } => {
                assert_eq!(collection, "posts");
                assert_eq!(page, 2);
                assert_eq!(limit, None);
                assert!(content);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_schema_command() {
        let cli = Cli::try_parse_from(["brevoza", "schema", "o", "r", "posts", "--branch", "dev"])
            .unwrap();
        match cli.command {
            Command::Schema {
                collection, branch, ..
            } => {
                assert_eq!(collection, "posts");
                assert_eq!(branch.as_deref(), Some("dev"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn propose_requires_a_field() {
        assert!(Cli::try_parse_from(["brevoza", "propose", "o", "r", "posts"]).is_err());
        let cli = Cli::try_parse_from([
            "brevoza", "propose", "o", "r", "posts", "--field", "id=a", "--field", "title=A",
        ])
        .unwrap();
        match cli.command {
            Command::Propose { fields, .. } => assert_eq!(fields, vec!["id=a", "title=A"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn proposals_state() {
        let cli = Cli::try_parse_from(["brevoza", "proposals", "o", "r", "--state", "all"]).unwrap();
        match cli.command {
            Command::Proposals { state, .. } => {
                assert_eq!(PrStateFilter::from(state), PrStateFilter::All)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
