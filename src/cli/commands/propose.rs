//! cli::commands::propose
//!
//! Propose a new item through a pull request.
//!
//! # Example
//!
//! ```bash
//! brevoza propose octocat site posts --field id=hello --field title="Hello world"
//! ```

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use super::{branch_or_default, build_service, load_config, Context};
use crate::service::CreateProposalRequest;
use crate::ui::output;

/// Arguments of the propose command.
#[derive(Debug, Clone)]
pub struct ProposeArgs {
    pub owner: String,
    pub repo: String,
    pub collection: String,
    pub fields: Vec<String>,
    pub path: Option<String>,
    pub base: Option<String>,
    pub branch_name: Option<String>,
}

/// Parse `key=value` arguments into item data.
///
/// Values are kept as strings. A repeated key keeps its last value.
pub fn parse_fields(fields: &[String]) -> Result<Map<String, Value>> {
    let mut data = Map::new();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("Invalid field '{}': expected KEY=VALUE", field);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid field '{}': key is empty", field);
        }
        data.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(data)
}

/// Run the propose command.
pub fn propose(ctx: &Context, args: ProposeArgs) -> Result<()> {
    let item_data = parse_fields(&args.fields)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(propose_async(ctx, args, item_data))
}

async fn propose_async(ctx: &Context, args: ProposeArgs, item_data: Map<String, Value>) -> Result<()> {
    let config = load_config()?;
    let service = build_service(&config)?;
    let verbosity = ctx.verbosity();

    output::print(
        format!("Proposing new {} item in {}/{}...", args.collection, args.owner, args.repo),
        verbosity,
    );
    let receipt = service
        .create_proposal(CreateProposalRequest {
            owner: args.owner,
            repo: args.repo,
            collection_name: args.collection,
            item_data,
            target_path: args.path,
            base_branch: Some(branch_or_default(args.base, &config)),
            branch_name: args.branch_name,
        })
        .await?;

    if ctx.json {
        output::print_json(&receipt)?;
        return Ok(());
    }
    output::success(
        format!(
            "Opened PR #{}: {}\n  {} on {} -> {}",
            receipt.pr_number,
            receipt.pr_url,
            receipt.target_path,
            receipt.branch_name,
            receipt.base_branch
        ),
        verbosity,
    );
    Ok(())
}
