//! service
//!
//! The core boundary.
//!
//! [`ContentService`] exposes the read and write operations as plain
//! request/response values. Every request names its repository and branch
//! explicitly; the service holds only the forge and a few tuning options.
//! Required parameters are validated before any host call, and every failure
//! is a [`CoreError`] with a stable kind.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brevoza::forge::mock::MockForge;
//! use brevoza::service::{ContentService, ListItemsRequest};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new()
//!     .with_file("main", "brevoza.config.yml", "collections:\n  posts:\n    config: posts.yml\n")
//!     .with_file("main", "posts.yml", "properties:\n    title:\n      type: string\n")
//!     .with_file("main", "posts/hello.json", "{}");
//! let service = ContentService::new(Arc::new(forge));
//!
//! let page = service
//!     .list_items(ListItemsRequest::new("octocat", "site", "posts"))
//!     .await
//!     .unwrap();
//! assert_eq!(page.items.len(), 1);
//! assert_eq!(page.pagination.total_count, 1);
//! # });
//! ```

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::content::collections::find_collection;
use crate::content::{
    fetch_items, paginate, parse_collections, parse_schema, resolve_items, CollectionEntry,
    CollectionSchema, FetchMode, ItemFile, Pagination,
};
use crate::core::config::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_LIST_LIMIT, DEFAULT_ROOT_CONFIG_PATH};
use crate::core::error::require_non_empty;
use crate::core::CoreError;
use crate::forge::{Forge, ForgeError, PrStateFilter, PullRequest, RepoRef};
use crate::proposal::{
    self, ModerationResult, ProposalReceipt, ProposalRequest, DEFAULT_BASE_BRANCH,
};

/// Tuning knobs for [`ContentService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Path of the root configuration document in each repository
    pub root_config_path: String,
    /// Maximum concurrent content reads per request
    pub fetch_concurrency: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            root_config_path: DEFAULT_ROOT_CONFIG_PATH.to_string(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

fn branch_or_default(branch: &Option<String>) -> &str {
    branch
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(DEFAULT_BASE_BRANCH)
}

fn repo_ref(owner: &str, repo: &str) -> Result<RepoRef, CoreError> {
    require_non_empty("owner", owner)?;
    require_non_empty("repo", repo)?;
    Ok(RepoRef::new(owner, repo))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollectionsRequest {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub branch: Option<String>,
}

/// One declared collection and its schema, or why the schema is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<CollectionSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsRequest {
    pub owner: String,
    pub repo: String,
    pub collection_name: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub include_content: bool,
}

impl ListItemsRequest {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            collection_name: collection_name.into(),
            branch: None,
            page: default_page(),
            limit: default_limit(),
            include_content: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<ItemFile>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemContentRequest {
    pub owner: String,
    pub repo: String,
    pub path: String,
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemContent {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub owner: String,
    pub repo: String,
    pub collection_name: String,
    pub item_data: Map<String, Value>,
    /// Derived from the collection's storage descriptor when absent
    #[serde(default)]
    pub target_path: Option<String>,
    #[serde(default)]
    pub base_branch: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProposalsRequest {
    pub owner: String,
    pub repo: String,
    #[serde(default, with = "state_filter")]
    pub state: PrStateFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

mod state_filter {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::forge::PrStateFilter;

    pub fn serialize<S: Serializer>(state: &PrStateFilter, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(state.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PrStateFilter, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A collection's resolved configuration.
struct ResolvedCollection {
    schema_text: String,
    schema: CollectionSchema,
}

/// Read and moderate repository-backed content through a [`Forge`].
#[derive(Clone)]
pub struct ContentService {
    forge: Arc<dyn Forge>,
    options: ServiceOptions,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("forge", &self.forge.name())
            .field("options", &self.options)
            .finish()
    }
}

impl ContentService {
    pub fn new(forge: Arc<dyn Forge>) -> Self {
        Self::with_options(forge, ServiceOptions::default())
    }

    pub fn with_options(forge: Arc<dyn Forge>, options: ServiceOptions) -> Self {
        Self { forge, options }
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    async fn read_text(&self, repo: &RepoRef, branch: &str, path: &str) -> Result<String, ForgeError> {
        let bytes = self.forge.get_file_content(repo, branch, path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn read_root_config(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Vec<CollectionEntry>, CoreError> {
        let root = &self.options.root_config_path;
        debug!(repo = %repo, branch, path = %root, "reading root configuration");
        let text = self
            .read_text(repo, branch, root)
            .await
            .map_err(|e| match e {
                ForgeError::NotFound(_) => CoreError::NotFound(format!(
                    "{} not found in {} on branch '{}'",
                    root, repo, branch
                )),
                other => other.into(),
            })?;
        Ok(parse_collections(&text))
    }

    async fn resolve_collection(
        &self,
        repo: &RepoRef,
        branch: &str,
        collection: &str,
    ) -> Result<ResolvedCollection, CoreError> {
        let entries = self.read_root_config(repo, branch).await?;
        let entry = find_collection(&entries, collection).ok_or_else(|| {
            CoreError::NotFound(format!(
                "collection '{}' not found in {}",
                collection, self.options.root_config_path
            ))
        })?;
        let config_path = entry.config_path.as_deref().ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "collection '{}' has no config file specified",
                collection
            ))
        })?;

        let schema_text = self
            .read_text(repo, branch, config_path)
            .await
            .map_err(|e| match e {
                ForgeError::NotFound(_) => CoreError::NotFound(format!(
                    "config file '{}' for collection '{}' not found",
                    config_path, collection
                )),
                other => other.into(),
            })?;
        let schema = parse_schema(&schema_text);
        Ok(ResolvedCollection {
            schema_text,
            schema,
        })
    }

    /// Every declared collection with its schema.
    ///
    /// Schema documents are read concurrently. A collection whose schema
    /// cannot be read carries an error message instead of failing the call.
    pub async fn list_collections(
        &self,
        request: ListCollectionsRequest,
    ) -> Result<Vec<CollectionSummary>, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        let branch = branch_or_default(&request.branch);
        let entries = self.read_root_config(&repo, branch).await?;

        let summaries = entries.into_iter().map(|entry| {
            let repo = &repo;
            async move {
                let Some(config_path) = entry.config_path.clone() else {
                    return CollectionSummary {
                        name: entry.name,
                        config_path: None,
                        schema: None,
                        error: Some("no config file specified for this collection".into()),
                    };
                };
                match self.read_text(repo, branch, &config_path).await {
                    Ok(text) => CollectionSummary {
                        name: entry.name,
                        config_path: Some(config_path),
                        schema: Some(parse_schema(&text)),
                        error: None,
                    },
                    Err(e) => CollectionSummary {
                        name: entry.name,
                        config_path: Some(config_path),
                        schema: None,
                        error: Some(e.to_string()),
                    },
                }
            }
        });
        Ok(join_all(summaries).await)
    }

    /// The schema of one collection.
    pub async fn get_schema(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        collection: &str,
    ) -> Result<CollectionSchema, CoreError> {
        let repo = repo_ref(owner, repo)?;
        require_non_empty("collectionName", collection)?;
        let branch = branch_or_default(&branch.map(str::to_string)).to_string();
        Ok(self
            .resolve_collection(&repo, &branch, collection)
            .await?
            .schema)
    }

    /// One page of a collection's items.
    ///
    /// The full item set is resolved (and, with `include_content`, fetched)
    /// before the page is sliced out of it.
    pub async fn list_items(&self, request: ListItemsRequest) -> Result<ListItemsResponse, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        require_non_empty("collectionName", &request.collection_name)?;
        Pagination::new(request.page, request.limit, 0)?;
        let branch = branch_or_default(&request.branch);
        let collection = request.collection_name.as_str();

        let resolved = self.resolve_collection(&repo, branch, collection).await?;
        let entries =
            resolve_items(self.forge.as_ref(), &repo, branch, collection, &resolved.schema_text)
                .await?;
        let fetched = fetch_items(
            self.forge.as_ref(),
            &repo,
            branch,
            entries,
            FetchMode::from_include_content(request.include_content),
            self.options.fetch_concurrency,
        )
        .await;

        let (items, pagination) = paginate(fetched.items, request.page, request.limit)?;
        Ok(ListItemsResponse { items, pagination })
    }

    /// Raw content of one file.
    pub async fn get_item_content(
        &self,
        request: GetItemContentRequest,
    ) -> Result<ItemContent, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        require_non_empty("path", &request.path)?;
        let branch = branch_or_default(&request.branch);

        let content = self
            .read_text(&repo, branch, &request.path)
            .await
            .map_err(|e| match e {
                ForgeError::NotFound(_) => CoreError::NotFound(format!(
                    "'{}' not found on branch '{}'",
                    request.path, branch
                )),
                other => other.into(),
            })?;
        Ok(ItemContent {
            path: request.path,
            content,
        })
    }

    /// Propose a new item as a change request.
    ///
    /// Without a target path, the path is derived from the collection's
    /// storage descriptor on the base branch.
    pub async fn create_proposal(
        &self,
        request: CreateProposalRequest,
    ) -> Result<ProposalReceipt, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        require_non_empty("collectionName", &request.collection_name)?;
        let base = branch_or_default(&request.base_branch).to_string();

        let target_path = match request.target_path.filter(|p| !p.trim().is_empty()) {
            Some(path) => path,
            None => {
                let resolved = self
                    .resolve_collection(&repo, &base, &request.collection_name)
                    .await?;
                resolved
                    .schema
                    .storage
                    .item_path(&request.collection_name, &request.item_data)
            }
        };

        let mut proposal =
            ProposalRequest::new(request.collection_name, request.item_data, target_path)
                .with_base_branch(base);
        proposal.branch_name = request.branch_name;
        proposal::create_proposal(self.forge.as_ref(), &repo, proposal).await
    }

    /// Change requests, newest first.
    pub async fn list_proposals(
        &self,
        request: ListProposalsRequest,
    ) -> Result<Vec<PullRequest>, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        proposal::list_proposals(self.forge.as_ref(), &repo, request.state).await
    }

    /// Merge a proposal.
    pub async fn approve(&self, request: ModerationRequest) -> Result<ModerationResult, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        proposal::approve(self.forge.as_ref(), &repo, request.pr_number).await
    }

    /// Close a proposal without merging.
    pub async fn reject(&self, request: ModerationRequest) -> Result<ModerationResult, CoreError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        proposal::reject(self.forge.as_ref(), &repo, request.pr_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::{MockForge, MockOperation};
    use serde_json::json;

    const ROOT: &str = "collections:\n  posts:\n    config: schemas/posts.yml\n  pages:\n";
    const POSTS_SCHEMA: &str = "\
schema:
  properties:
    title:
      type: string
    body:
      type: markdown
  required:
    - title
storage:
  path: content/posts
  format: json
";

    fn forge() -> MockForge {
        MockForge::new()
            .with_file("main", "brevoza.config.yml", ROOT)
            .with_file("main", "schemas/posts.yml", POSTS_SCHEMA)
            .with_file("main", "content/posts/a.json", "{\"id\":\"a\"}")
            .with_file("main", "content/posts/b.json", "{\"id\":\"b\"}")
            .with_file("main", "content/posts/c.json", "{\"id\":\"c\"}")
    }

    fn service(forge: &MockForge) -> ContentService {
        ContentService::new(Arc::new(forge.clone()))
    }

    mod list_items {
        use super::*;

        #[tokio::test]
        async fn pages_through_items() {
            let forge = forge();
            let mut request = ListItemsRequest::new("octocat", "site", "posts");
            request.page = 2;
            request.limit = 2;

            let response = service(&forge).list_items(request).await.unwrap();

            assert_eq!(response.items.len(), 1);
            assert_eq!(response.items[0].path, "content/posts/c.json");
            assert_eq!(response.pagination.total_count, 3);
            assert!(response.pagination.has_previous_page);
            assert!(!response.pagination.has_next_page);
        }

        #[tokio::test]
        async fn include_content_fetches_every_item() {
            let forge = forge();
            let mut request = ListItemsRequest::new("octocat", "site", "posts");
            request.include_content = true;
            request.limit = 1;

            let response = service(&forge).list_items(request).await.unwrap();
            assert_eq!(response.items[0].content.as_deref(), Some("{\"id\":\"a\"}"));

            let reads = forge
                .operations()
                .into_iter()
                .filter(|op| {
                    matches!(op, MockOperation::GetFileContent { path, .. } if path.starts_with("content/"))
                })
                .count();
            assert_eq!(reads, 3);
        }

        #[tokio::test]
        async fn unknown_collection() {
            let forge = forge();
            let err = service(&forge)
                .list_items(ListItemsRequest::new("octocat", "site", "news"))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                CoreError::NotFound("collection 'news' not found in brevoza.config.yml".into())
            );
        }

        #[tokio::test]
        async fn collection_without_config() {
            let forge = forge();
            let err = service(&forge)
                .list_items(ListItemsRequest::new("octocat", "site", "pages"))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                CoreError::InvalidInput("collection 'pages' has no config file specified".into())
            );
        }

        #[tokio::test]
        async fn missing_root_config() {
            let forge = MockForge::new().with_branch("main");
            let err = service(&forge)
                .list_items(ListItemsRequest::new("octocat", "site", "posts"))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::NotFound(_)));
        }

        #[tokio::test]
        async fn invalid_input_makes_no_host_calls() {
            let forge = forge();
            let mut request = ListItemsRequest::new("octocat", "site", "posts");
            request.limit = 0;
            let err = service(&forge).list_items(request).await.unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)));

            let err = service(&forge)
                .list_items(ListItemsRequest::new("", "site", "posts"))
                .await
                .unwrap_err();
            assert_eq!(err, CoreError::InvalidInput("owner is required".into()));
            assert!(forge.operations().is_empty());
        }

        #[test]
        fn request_defaults_from_json() {
            let request: ListItemsRequest = serde_json::from_value(json!({
                "owner": "octocat",
                "repo": "site",
                "collectionName": "posts"
            }))
            .unwrap();
            assert_eq!(request.page, 1);
            assert_eq!(request.limit, DEFAULT_LIST_LIMIT);
            assert!(!request.include_content);
        }
    }

    mod get_schema {
        use super::*;

        #[tokio::test]
        async fn reads_schema_on_default_branch() {
            let forge = forge();
            let schema = service(&forge)
                .get_schema("octocat", "site", None, "posts")
                .await
                .unwrap();

            assert_eq!(schema.required, vec!["title"]);
            assert!(schema.undeclared_required().is_empty());
            assert_eq!(schema.storage.directory("posts"), "content/posts/");

            let reads: Vec<_> = forge
                .operations()
                .into_iter()
                .filter_map(|op| match op {
                    MockOperation::GetFileContent { git_ref, path } => Some((git_ref, path)),
                    _ => None,
                })
                .collect();
            assert_eq!(
                reads,
                vec![
                    ("main".to_string(), "brevoza.config.yml".to_string()),
                    ("main".to_string(), "schemas/posts.yml".to_string()),
                ]
            );
        }

        #[tokio::test]
        async fn reads_requested_branch() {
            let forge = MockForge::new()
                .with_file("draft", "brevoza.config.yml", ROOT)
                .with_file("draft", "schemas/posts.yml", "schema:\n  required:\n    - slug\n");
            let schema = service(&forge)
                .get_schema("octocat", "site", Some("draft"), "posts")
                .await
                .unwrap();
            assert_eq!(schema.undeclared_required(), vec!["slug"]);
        }

        #[tokio::test]
        async fn missing_schema_file() {
            let forge = MockForge::new().with_file("main", "brevoza.config.yml", ROOT);
            let err = service(&forge)
                .get_schema("octocat", "site", None, "posts")
                .await
                .unwrap_err();
            assert_eq!(
                err,
                CoreError::NotFound(
                    "config file 'schemas/posts.yml' for collection 'posts' not found".into()
                )
            );
        }

        #[tokio::test]
        async fn empty_collection_name() {
            let forge = forge();
            let err = service(&forge)
                .get_schema("octocat", "site", None, "")
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)));
            assert!(forge.operations().is_empty());
        }
    }

    #[tokio::test]
    async fn list_collections_reports_per_collection_errors() {
        let forge = forge();
        let summaries = service(&forge)
            .list_collections(ListCollectionsRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                branch: None,
            })
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        let posts = &summaries[0];
        assert_eq!(posts.name, "posts");
        let schema = posts.schema.as_ref().unwrap();
        assert_eq!(schema.required, vec!["title"]);
        assert_eq!(schema.properties.len(), 2);
        assert!(summaries[1].schema.is_none());
        assert!(summaries[1].error.is_some());
    }

    #[tokio::test]
    async fn get_item_content() {
        let forge = forge();
        let content = service(&forge)
            .get_item_content(GetItemContentRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                path: "content/posts/b.json".into(),
                branch: None,
            })
            .await
            .unwrap();
        assert_eq!(content.content, "{\"id\":\"b\"}");

        let err = service(&forge)
            .get_item_content(GetItemContentRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                path: " ".into(),
                branch: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::InvalidInput("path is required".into()));
    }

    #[tokio::test]
    async fn proposal_path_derived_from_storage() {
        let forge = forge();
        let receipt = service(&forge)
            .create_proposal(CreateProposalRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                collection_name: "posts".into(),
                item_data: json!({ "id": "d", "title": "D" })
                    .as_object()
                    .cloned()
                    .unwrap(),
                target_path: None,
                base_branch: None,
                branch_name: Some("add-posts-item-9".into()),
            })
            .await
            .unwrap();

        assert_eq!(receipt.target_path, "content/posts/d.json");
        assert!(forge
            .file("add-posts-item-9", "content/posts/d.json")
            .is_some());
    }

    #[tokio::test]
    async fn moderation_round_trip() {
        let forge = forge();
        let service = service(&forge);
        let receipt = service
            .create_proposal(CreateProposalRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                collection_name: "posts".into(),
                item_data: json!({ "id": "e" }).as_object().cloned().unwrap(),
                target_path: Some("content/posts/e.json".into()),
                base_branch: None,
                branch_name: Some("add-posts-item-10".into()),
            })
            .await
            .unwrap();

        let open = service
            .list_proposals(ListProposalsRequest {
                owner: "octocat".into(),
                repo: "site".into(),
                state: PrStateFilter::Open,
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);

        let request = ModerationRequest {
            owner: "octocat".into(),
            repo: "site".into(),
            pr_number: receipt.pr_number,
        };
        service.approve(request.clone()).await.unwrap();
        assert!(forge.file("main", "content/posts/e.json").is_some());
        assert!(matches!(
            service.reject(request).await,
            Err(CoreError::Conflict(_))
        ));
    }

    #[test]
    fn proposals_request_state_parses() {
        let request: ListProposalsRequest = serde_json::from_value(json!({
            "owner": "o",
            "repo": "r",
            "state": "all"
        }))
        .unwrap();
        assert_eq!(request.state, PrStateFilter::All);

        let request: ListProposalsRequest =
            serde_json::from_value(json!({ "owner": "o", "repo": "r" })).unwrap();
        assert_eq!(request.state, PrStateFilter::Open);

        assert!(serde_json::from_value::<ListProposalsRequest>(json!({
            "owner": "o",
            "repo": "r",
            "state": "merged"
        }))
        .is_err());
    }
}
