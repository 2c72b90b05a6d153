//! proposal::writer
//!
//! Turns an item submission into a reviewable change request.
//!
//! # Sequence
//!
//! Each step needs the result of the previous one and none is retried:
//!
//! 1. Resolve the base branch head commit
//! 2. Create the proposal branch at that commit
//! 3. Create the item file on the proposal branch
//! 4. Open a change request from the proposal branch into the base branch
//!
//! Nothing is rolled back. If step 3 or 4 fails, the branch created in step 2
//! stays on the host; a warning names it so it can be removed by hand.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::content::schema::{StorageFormat, DEFAULT_ITEM_ID};
use crate::core::error::require_non_empty;
use crate::core::types::{BranchName, RepoPath};
use crate::core::CoreError;
use crate::forge::{CreateFileRequest, CreatePrRequest, Forge, ForgeError, RepoRef};

/// Base branch used when the request names none.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// A request to propose a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalRequest {
    pub collection: String,
    pub item_data: Map<String, Value>,
    /// Repository-relative path of the new item file
    pub target_path: String,
    pub base_branch: Option<String>,
    /// Proposal branch; generated from the collection and clock when absent
    pub branch_name: Option<String>,
}

impl ProposalRequest {
    pub fn new(
        collection: impl Into<String>,
        item_data: Map<String, Value>,
        target_path: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            item_data,
            target_path: target_path.into(),
            base_branch: None,
            branch_name: None,
        }
    }

    pub fn with_base_branch(mut self, base: impl Into<String>) -> Self {
        self.base_branch = Some(base.into());
        self
    }

    pub fn with_branch_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = Some(name.into());
        self
    }
}

/// What a successful proposal produced on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalReceipt {
    pub pr_url: String,
    pub pr_number: u64,
    pub branch_name: String,
    pub base_branch: String,
    pub target_path: String,
}

/// Generated proposal branch name: `add-<collection>-item-<millis>`.
pub fn default_branch_name(collection: &str, millis: i64) -> String {
    format!("add-{}-item-{}", collection, millis)
}

/// Human label of an item: its `id`, else its `name`, else `new-item`.
pub fn item_label(item: &Map<String, Value>) -> String {
    ["id", "name"]
        .iter()
        .filter_map(|key| match item.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| DEFAULT_ITEM_ID.to_string())
}

fn commit_message(collection: &str, label: &str) -> String {
    format!("Add new {} item: {}", collection, label)
}

fn pr_title(collection: &str, label: &str) -> String {
    format!("Add new {}: {}", collection, label)
}

fn pr_body(collection: &str, path: &str, format: StorageFormat, content: &str) -> String {
    format!(
        "This PR adds a new item to the **{}** collection.\n\n**File:** `{}`\n\n**Data:**\n```{}\n{}\n```",
        collection,
        path,
        format.fence_tag(),
        content.trim_end()
    )
}

struct Validated {
    base: BranchName,
    branch: BranchName,
    path: RepoPath,
}

fn validate(request: &ProposalRequest) -> Result<Validated, CoreError> {
    require_non_empty("collectionName", &request.collection)?;
    require_non_empty("targetPath", &request.target_path)?;

    let base = BranchName::new(
        request
            .base_branch
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_BRANCH),
    )?;
    let branch = match request.branch_name.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(name) => BranchName::new(name)?,
        None => BranchName::new(default_branch_name(
            &request.collection,
            chrono::Utc::now().timestamp_millis(),
        ))?,
    };
    if branch == base {
        return Err(CoreError::InvalidInput(format!(
            "proposal branch '{}' is the base branch",
            branch
        )));
    }
    let path = RepoPath::new(request.target_path.as_str())?;

    Ok(Validated { base, branch, path })
}

/// Create a proposal: branch, item file, change request.
///
/// The item is serialized in the format implied by the target path's
/// extension (JSON when unrecognised).
///
/// # Errors
///
/// - `InvalidInput` for a missing collection or malformed path/branch name,
///   before any host call
/// - `NotFound` if the base branch does not exist
/// - `Conflict` if the branch, the file, or an equivalent change request
///   already exists
/// - `UpstreamFailure` for any other host failure
pub async fn create_proposal(
    forge: &dyn Forge,
    repo: &RepoRef,
    request: ProposalRequest,
) -> Result<ProposalReceipt, CoreError> {
    let Validated { base, branch, path } = validate(&request)?;

    let format = StorageFormat::from_path(path.as_str()).unwrap_or_default();
    let content = format.serialize_item(&request.item_data)?;
    let label = item_label(&request.item_data);

    debug!(repo = %repo, base = %base, "resolving base branch head");
    let head = forge
        .get_branch_head(repo, base.as_str())
        .await
        .map_err(|e| match e {
            ForgeError::NotFound(_) => {
                CoreError::NotFound(format!("base branch '{}' not found", base))
            }
            other => CoreError::from(other),
        })?;

    debug!(branch = %branch, commit = %head, "creating proposal branch");
    forge
        .create_branch(repo, branch.as_str(), &head)
        .await
        .map_err(|e| match e {
            ForgeError::Conflict(_) => {
                CoreError::Conflict(format!("branch '{}' already exists", branch))
            }
            other => CoreError::from(other),
        })?;

    let file = CreateFileRequest {
        branch: branch.to_string(),
        path: path.to_string(),
        content: content.clone().into_bytes(),
        message: commit_message(&request.collection, &label),
    };
    debug!(branch = %branch, path = %path, "creating item file");
    if let Err(e) = forge.create_file(repo, file).await {
        warn!(branch = %branch, "proposal branch left behind after failed file creation");
        return Err(match e {
            ForgeError::Conflict(_) => CoreError::Conflict(format!(
                "'{}' already exists on branch '{}'",
                path, branch
            )),
            other => CoreError::from(other),
        });
    }

    let pr = CreatePrRequest {
        head: branch.to_string(),
        base: base.to_string(),
        title: pr_title(&request.collection, &label),
        body: Some(pr_body(&request.collection, path.as_str(), format, &content)),
    };
    let pr = match forge.open_change_request(repo, pr).await {
        Ok(pr) => pr,
        Err(e) => {
            warn!(branch = %branch, "proposal branch left behind after failed change request");
            return Err(e.into());
        }
    };

    info!(number = pr.number, url = %pr.url, "opened proposal");
    Ok(ProposalReceipt {
        pr_url: pr.url,
        pr_number: pr.number,
        branch_name: branch.to_string(),
        base_branch: base.to_string(),
        target_path: path.to_string(),
    })
}
