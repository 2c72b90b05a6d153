//! proposal::moderation
//!
//! Approve (merge) or reject (close) a pending proposal.
//!
//! A proposal moves `open -> merged` or `open -> closed` and never back.
//! Each transition happens only on an explicit call; no state is tracked
//! here, so repeating a call fails once the first one has succeeded.

use serde::Serialize;
use tracing::info;

use crate::core::CoreError;
use crate::forge::{Forge, ForgeError, MergeMethod, PrState, PrStateFilter, PullRequest, RepoRef};

/// Terminal state reached by a moderation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Merged,
    Closed,
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Merged => write!(f, "merged"),
            ModerationStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResult {
    pub pr_number: u64,
    pub status: ModerationStatus,
    pub message: String,
}

fn require_number(number: u64) -> Result<(), CoreError> {
    if number == 0 {
        Err(CoreError::InvalidInput("prNumber must be at least 1".into()))
    } else {
        Ok(())
    }
}

fn not_found_or(number: u64, err: ForgeError) -> CoreError {
    match err {
        ForgeError::NotFound(_) => {
            CoreError::NotFound(format!("pull request #{} not found", number))
        }
        other => other.into(),
    }
}

/// Merge proposal `number` into its base branch.
///
/// # Errors
///
/// - `NotFound` if the change request does not exist
/// - `Conflict` if the host refuses the merge (merge conflicts, failing
///   checks, or a change request that is no longer open)
pub async fn approve(
    forge: &dyn Forge,
    repo: &RepoRef,
    number: u64,
) -> Result<ModerationResult, CoreError> {
    require_number(number)?;

    let outcome = forge
        .merge_change_request(repo, number, MergeMethod::Merge)
        .await
        .map_err(|e| match e {
            ForgeError::Conflict(m) => CoreError::Conflict(format!(
                "pull request #{} cannot be merged: {}",
                number, m
            )),
            other => not_found_or(number, other),
        })?;

    if !outcome.merged {
        return Err(CoreError::Conflict(format!(
            "pull request #{} cannot be merged: {}",
            number, outcome.message
        )));
    }

    info!(repo = %repo, number, "approved proposal");
    Ok(ModerationResult {
        pr_number: number,
        status: ModerationStatus::Merged,
        message: outcome.message,
    })
}

/// Close proposal `number` without merging.
///
/// # Errors
///
/// - `NotFound` if the change request does not exist
/// - `Conflict` if the host reports it already closed or merged
pub async fn reject(
    forge: &dyn Forge,
    repo: &RepoRef,
    number: u64,
) -> Result<ModerationResult, CoreError> {
    require_number(number)?;

    let pr = forge
        .close_change_request(repo, number)
        .await
        .map_err(|e| not_found_or(number, e))?;

    if pr.state == PrState::Merged {
        return Err(CoreError::Conflict(format!(
            "pull request #{} is already merged",
            number
        )));
    }

    info!(repo = %repo, number, "rejected proposal");
    Ok(ModerationResult {
        pr_number: number,
        status: ModerationStatus::Closed,
        message: format!("pull request #{} closed", number),
    })
}

/// Change requests in `state`, newest first.
pub async fn list_proposals(
    forge: &dyn Forge,
    repo: &RepoRef,
    state: PrStateFilter,
) -> Result<Vec<PullRequest>, CoreError> {
    Ok(forge.list_change_requests(repo, state).await?)
}
