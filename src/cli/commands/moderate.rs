//! cli::commands::moderate
//!
//! List, approve, and reject proposals.
//!
//! # Example
//!
//! ```bash
//! brevoza proposals octocat site --state all
//! brevoza approve octocat site 42
//! brevoza reject octocat site 43
//! ```

use anyhow::Result;

use super::{build_service, load_config, Context};
use crate::forge::{PrStateFilter, PullRequest};
use crate::service::{ListProposalsRequest, ModerationRequest};
use crate::ui::output;

/// Run the proposals command.
pub fn proposals(ctx: &Context, owner: &str, repo: &str, state: PrStateFilter) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(proposals_async(ctx, owner, repo, state))
}

async fn proposals_async(
    ctx: &Context,
    owner: &str,
    repo: &str,
    state: PrStateFilter,
) -> Result<()> {
    let service = build_service(&load_config()?)?;
    let prs = service
        .list_proposals(ListProposalsRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            state,
        })
        .await?;

    if ctx.json {
        output::print_json(&prs)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    if prs.is_empty() {
        output::print(format!("No {} proposals.", state.as_str()), verbosity);
        return Ok(());
    }
    let lines: Vec<String> = prs.iter().map(summary_line).collect();
    output::print(output::format_list(&lines, ""), verbosity);
    Ok(())
}

fn summary_line(pr: &PullRequest) -> String {
    let author = pr.author.as_deref().unwrap_or("unknown");
    format!(
        "#{} [{}] {} ({} -> {}, by {})",
        pr.number,
        pr.state,
        output::truncate(&pr.title, 60),
        pr.head,
        pr.base,
        author
    )
}

/// Run the approve command.
pub fn approve(ctx: &Context, owner: &str, repo: &str, number: u64) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(moderate_async(ctx, owner, repo, number, true))
}

/// Run the reject command.
pub fn reject(ctx: &Context, owner: &str, repo: &str, number: u64) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(moderate_async(ctx, owner, repo, number, false))
}

async fn moderate_async(
    ctx: &Context,
    owner: &str,
    repo: &str,
    number: u64,
    merge: bool,
) -> Result<()> {
    let service = build_service(&load_config()?)?;
    let request = ModerationRequest {
        owner: owner.to_string(),
        repo: repo.to_string(),
        pr_number: number,
    };
    let result = if merge {
        service.approve(request).await?
    } else {
        service.reject(request).await?
    };

    if ctx.json {
        output::print_json(&result)?;
    } else {
        output::success(
            format!("PR #{} {}: {}", result.pr_number, result.status, result.message),
            ctx.verbosity(),
        );
    }
    Ok(())
}
