//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge keeps a small in-memory model of one repository: branches
//! pointing at synthetic commit ids, files per branch, and change requests.
//! The `RepoRef` argument of each call is ignored. Every call is recorded so
//! tests can assert on call order, and a single operation can be configured
//! to fail.
//!
//! # Example
//!
//! ```
//! use brevoza::forge::mock::{MockForge, MockOperation};
//! use brevoza::forge::{Forge, RepoRef};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_file("main", "posts/hello.json", "{}");
//! let repo = RepoRef::new("octocat", "site");
//!
//! let entries = forge.list_directory(&repo, "main", "posts").await.unwrap();
//! assert_eq!(entries.len(), 1);
//! assert!(matches!(forge.operations()[0], MockOperation::ListDirectory { .. }));
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{
    CreateFileRequest, CreatePrRequest, DirEntry, EntryKind, Forge, ForgeError, MergeMethod,
    MergeOutcome, PrState, PrStateFilter, PullRequest, RepoRef,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Default)]
struct MockForgeInner {
    /// Branch name to head commit id.
    branches: HashMap<String, String>,
    /// File contents keyed by (branch, path).
    files: BTreeMap<(String, String), Vec<u8>>,
    /// Directories that exist without any file below them, keyed by (branch, path).
    empty_dirs: BTreeSet<(String, String)>,
    /// Stored PRs by number.
    prs: BTreeMap<u64, PullRequest>,
    /// PRs the host refuses to merge (merge answers `merged: false`).
    unmergeable: HashSet<u64>,
    next_pr_number: u64,
    next_commit: u64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

impl MockForgeInner {
    fn new_commit(&mut self) -> String {
        self.next_commit += 1;
        format!("{:040x}", self.next_commit)
    }

    fn require_branch(&self, branch: &str) -> Result<(), ForgeError> {
        if self.branches.contains_key(branch) {
            Ok(())
        } else {
            Err(ForgeError::NotFound(format!("branch '{}'", branch)))
        }
    }

    fn is_dir(&self, branch: &str, path: &str) -> bool {
        let prefix = format!("{}/", path);
        self.files
            .keys()
            .any(|(b, p)| b == branch && p.starts_with(&prefix))
            || self
                .empty_dirs
                .iter()
                .any(|(b, p)| b == branch && (p == path || p.starts_with(&prefix)))
    }
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetFileContent(ForgeError),
    /// Fail only listings of this exact path.
    ListDirectoryAt(String, ForgeError),
    GetBranchHead(ForgeError),
    CreateBranch(ForgeError),
    CreateFile(ForgeError),
    OpenChangeRequest(ForgeError),
    ListChangeRequests(ForgeError),
    MergeChangeRequest(ForgeError),
    CloseChangeRequest(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetFileContent {
        git_ref: String,
        path: String,
    },
    ListDirectory {
        git_ref: String,
        path: String,
    },
    GetBranchHead {
        branch: String,
    },
    CreateBranch {
        branch: String,
        from_commit: String,
    },
    CreateFile {
        branch: String,
        path: String,
        message: String,
    },
    OpenChangeRequest {
        head: String,
        base: String,
        title: String,
    },
    ListChangeRequests {
        state: PrStateFilter,
    },
    MergeChangeRequest {
        number: u64,
        method: MergeMethod,
    },
    CloseChangeRequest {
        number: u64,
    },
}

impl MockForge {
    /// Create a new empty mock forge with no branches.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                next_pr_number: 1,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockForgeInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an empty branch (no-op if it already exists).
    pub fn with_branch(self, branch: &str) -> Self {
        {
            let mut inner = self.state();
            if !inner.branches.contains_key(branch) {
                let commit = inner.new_commit();
                inner.branches.insert(branch.to_string(), commit);
            }
        }
        self
    }

    /// Add a file on `branch`, creating the branch if needed.
    pub fn with_file(self, branch: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        let forge = self.with_branch(branch);
        {
            let mut inner = forge.state();
            inner
                .files
                .insert((branch.to_string(), path.to_string()), content.into());
            let commit = inner.new_commit();
            inner.branches.insert(branch.to_string(), commit);
        }
        forge
    }

    /// Add a directory with no entries on `branch`.
    pub fn with_empty_dir(self, branch: &str, path: &str) -> Self {
        let forge = self.with_branch(branch);
        forge
            .state()
            .empty_dirs
            .insert((branch.to_string(), path.to_string()));
        forge
    }

    /// Add a pre-existing PR; later PRs are numbered after it.
    pub fn with_pr(self, pr: PullRequest) -> Self {
        {
            let mut inner = self.state();
            inner.next_pr_number = inner.next_pr_number.max(pr.number + 1);
            inner.prs.insert(pr.number, pr);
        }
        self
    }

    /// Make the host answer `merged: false` when merging PR `number`.
    pub fn with_unmergeable(self, number: u64) -> Self {
        self.state().unmergeable.insert(number);
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use brevoza::forge::mock::{MockForge, FailOn};
    /// use brevoza::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateFile(ForgeError::Conflict("exists".into())));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.state().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }

    /// Head commit of `branch`, if it exists.
    pub fn branch_head(&self, branch: &str) -> Option<String> {
        self.state().branches.get(branch).cloned()
    }

    /// Content of `path` on `branch`, if present.
    pub fn file(&self, branch: &str, path: &str) -> Option<Vec<u8>> {
        self.state()
            .files
            .get(&(branch.to_string(), path.to_string()))
            .cloned()
    }

    /// Get a PR by number.
    pub fn pr(&self, number: u64) -> Option<PullRequest> {
        self.state().prs.get(&number).cloned()
    }

    fn record(&self, op: MockOperation) {
        self.state().operations.push(op);
    }

    /// Return the configured error if it targets `operation` (and `path` for listings).
    fn check_fail(&self, operation: &str, path: Option<&str>) -> Option<ForgeError> {
        match (&self.state().fail_on, operation) {
            (Some(FailOn::GetFileContent(e)), "get_file_content")
            | (Some(FailOn::GetBranchHead(e)), "get_branch_head")
            | (Some(FailOn::CreateBranch(e)), "create_branch")
            | (Some(FailOn::CreateFile(e)), "create_file")
            | (Some(FailOn::OpenChangeRequest(e)), "open_change_request")
            | (Some(FailOn::ListChangeRequests(e)), "list_change_requests")
            | (Some(FailOn::MergeChangeRequest(e)), "merge_change_request")
            | (Some(FailOn::CloseChangeRequest(e)), "close_change_request") => Some(e.clone()),
            (Some(FailOn::ListDirectoryAt(at, e)), "list_directory") if Some(at.as_str()) == path => {
                Some(e.clone())
            }
            _ => None,
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a PR value for seeding the mock.
pub fn sample_pr(number: u64, head: &str, base: &str, state: PrState) -> PullRequest {
    PullRequest {
        number,
        url: format!("https://github.com/mock/repo/pull/{}", number),
        state,
        head: head.to_string(),
        base: base.to_string(),
        title: format!("PR #{}", number),
        body: None,
        author: Some("mock".to_string()),
        created_at: None,
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_file_content(
        &self,
        _repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError> {
        self.record(MockOperation::GetFileContent {
            git_ref: git_ref.to_string(),
            path: path.to_string(),
        });
        if let Some(e) = self.check_fail("get_file_content", Some(path)) {
            return Err(e);
        }

        let inner = self.state();
        inner.require_branch(git_ref)?;
        if inner.is_dir(git_ref, path) {
            return Err(ForgeError::NotFound(format!("'{}' is a directory", path)));
        }
        inner
            .files
            .get(&(git_ref.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("'{}' on {}", path, git_ref)))
    }

    async fn list_directory(
        &self,
        _repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ForgeError> {
        self.record(MockOperation::ListDirectory {
            git_ref: git_ref.to_string(),
            path: path.to_string(),
        });
        if let Some(e) = self.check_fail("list_directory", Some(path)) {
            return Err(e);
        }

        let inner = self.state();
        inner.require_branch(git_ref)?;

        let dir = path.trim_end_matches('/');
        if inner
            .files
            .contains_key(&(git_ref.to_string(), dir.to_string()))
        {
            return Err(ForgeError::NotADirectory(dir.to_string()));
        }
        if !dir.is_empty() && !inner.is_dir(git_ref, dir) {
            return Err(ForgeError::NotFound(format!("'{}' on {}", dir, git_ref)));
        }

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        let file_paths = inner
            .files
            .keys()
            .filter(|(b, _)| b == git_ref)
            .map(|(_, p)| p);
        let dir_paths = inner
            .empty_dirs
            .iter()
            .filter(|(b, _)| b == git_ref)
            .map(|(_, p)| p);

        // name -> kind, sorted by name
        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        for (p, is_file) in file_paths
            .map(|p| (p, true))
            .chain(dir_paths.map(|p| (p, false)))
        {
            let Some(rest) = p.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child.to_string(), EntryKind::Dir);
                }
                None if !rest.is_empty() => {
                    let kind = if is_file { EntryKind::File } else { EntryKind::Dir };
                    children.entry(rest.to_string()).or_insert(kind);
                }
                None => {}
            }
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| DirEntry {
                path: format!("{}{}", prefix, name),
                name,
                kind,
            })
            .collect())
    }

    async fn get_branch_head(&self, _repo: &RepoRef, branch: &str) -> Result<String, ForgeError> {
        self.record(MockOperation::GetBranchHead {
            branch: branch.to_string(),
        });
        if let Some(e) = self.check_fail("get_branch_head", None) {
            return Err(e);
        }

        self.branch_head(branch)
            .ok_or_else(|| ForgeError::NotFound(format!("branch '{}'", branch)))
    }

    async fn create_branch(
        &self,
        _repo: &RepoRef,
        branch: &str,
        from_commit: &str,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::CreateBranch {
            branch: branch.to_string(),
            from_commit: from_commit.to_string(),
        });
        if let Some(e) = self.check_fail("create_branch", None) {
            return Err(e);
        }

        let mut inner = self.state();
        if inner.branches.contains_key(branch) {
            return Err(ForgeError::Conflict("Reference already exists".into()));
        }
        let source = inner
            .branches
            .iter()
            .find(|(_, commit)| commit.as_str() == from_commit)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", from_commit)))?;

        let copied_files: Vec<_> = inner
            .files
            .iter()
            .filter(|((b, _), _)| *b == source)
            .map(|((_, p), c)| ((branch.to_string(), p.clone()), c.clone()))
            .collect();
        let copied_dirs: Vec<_> = inner
            .empty_dirs
            .iter()
            .filter(|(b, _)| *b == source)
            .map(|(_, p)| (branch.to_string(), p.clone()))
            .collect();
        inner.files.extend(copied_files);
        inner.empty_dirs.extend(copied_dirs);
        inner
            .branches
            .insert(branch.to_string(), from_commit.to_string());
        Ok(())
    }

    async fn create_file(
        &self,
        _repo: &RepoRef,
        request: CreateFileRequest,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::CreateFile {
            branch: request.branch.clone(),
            path: request.path.clone(),
            message: request.message.clone(),
        });
        if let Some(e) = self.check_fail("create_file", Some(&request.path)) {
            return Err(e);
        }

        let mut inner = self.state();
        inner.require_branch(&request.branch)?;
        let key = (request.branch.clone(), request.path.clone());
        if inner.files.contains_key(&key) || inner.is_dir(&request.branch, &request.path) {
            return Err(ForgeError::Conflict(format!(
                "'{}' already exists on {}",
                request.path, request.branch
            )));
        }
        inner.files.insert(key, request.content);
        let commit = inner.new_commit();
        inner.branches.insert(request.branch, commit);
        Ok(())
    }

    async fn open_change_request(
        &self,
        _repo: &RepoRef,
        request: CreatePrRequest,
    ) -> Result<PullRequest, ForgeError> {
        self.record(MockOperation::OpenChangeRequest {
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
        });
        if let Some(e) = self.check_fail("open_change_request", None) {
            return Err(e);
        }

        let mut inner = self.state();
        inner.require_branch(&request.head)?;
        inner.require_branch(&request.base)?;
        if inner
            .prs
            .values()
            .any(|p| p.head == request.head && p.base == request.base && p.state == PrState::Open)
        {
            return Err(ForgeError::Conflict(format!(
                "A pull request already exists for {}",
                request.head
            )));
        }

        let number = inner.next_pr_number;
        inner.next_pr_number += 1;
        let pr = PullRequest {
            number,
            url: format!("https://github.com/mock/repo/pull/{}", number),
            state: PrState::Open,
            head: request.head,
            base: request.base,
            title: request.title,
            body: request.body,
            author: Some("mock".to_string()),
            created_at: None,
        };
        inner.prs.insert(number, pr.clone());
        Ok(pr)
    }

    async fn list_change_requests(
        &self,
        _repo: &RepoRef,
        state: PrStateFilter,
    ) -> Result<Vec<PullRequest>, ForgeError> {
        self.record(MockOperation::ListChangeRequests { state });
        if let Some(e) = self.check_fail("list_change_requests", None) {
            return Err(e);
        }

        // Newest first: PR numbers grow with creation time.
        Ok(self
            .state()
            .prs
            .values()
            .rev()
            .filter(|p| state.matches(p.state))
            .cloned()
            .collect())
    }

    async fn merge_change_request(
        &self,
        _repo: &RepoRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeOutcome, ForgeError> {
        self.record(MockOperation::MergeChangeRequest { number, method });
        if let Some(e) = self.check_fail("merge_change_request", None) {
            return Err(e);
        }

        let mut inner = self.state();
        let pr = inner
            .prs
            .get(&number)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("PR #{}", number)))?;
        if pr.state != PrState::Open {
            return Err(ForgeError::Conflict("Pull Request is not mergeable".into()));
        }
        if inner.unmergeable.contains(&number) {
            return Ok(MergeOutcome {
                merged: false,
                message: "Pull Request is not mergeable".into(),
            });
        }

        let merged_files: Vec<_> = inner
            .files
            .iter()
            .filter(|((b, _), _)| *b == pr.head)
            .map(|((_, p), c)| ((pr.base.clone(), p.clone()), c.clone()))
            .collect();
        inner.files.extend(merged_files);
        let commit = inner.new_commit();
        inner.branches.insert(pr.base.clone(), commit);
        if let Some(stored) = inner.prs.get_mut(&number) {
            stored.state = PrState::Merged;
        }

        Ok(MergeOutcome {
            merged: true,
            message: "Pull Request successfully merged".into(),
        })
    }

    async fn close_change_request(
        &self,
        _repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, ForgeError> {
        self.record(MockOperation::CloseChangeRequest { number });
        if let Some(e) = self.check_fail("close_change_request", None) {
            return Err(e);
        }

        let mut inner = self.state();
        let pr = inner
            .prs
            .get_mut(&number)
            .ok_or_else(|| ForgeError::NotFound(format!("PR #{}", number)))?;
        match pr.state {
            PrState::Open => {
                pr.state = PrState::Closed;
                Ok(pr.clone())
            }
            PrState::Closed => Err(ForgeError::Conflict(format!("PR #{} is already closed", number))),
            PrState::Merged => Err(ForgeError::Conflict(format!("PR #{} is already merged", number))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoRef {
        RepoRef::new("mock", "repo")
    }

    fn pr_request(head: &str) -> CreatePrRequest {
        CreatePrRequest {
            head: head.to_string(),
            base: "main".to_string(),
            title: "Add item".to_string(),
            body: None,
        }
    }

    mod files {
        use super::*;

        #[tokio::test]
        async fn get_file_content() {
            let forge = MockForge::new().with_file("main", "brevoza.config.yml", "collections:\n");
            let bytes = forge
                .get_file_content(&repo(), "main", "brevoza.config.yml")
                .await
                .unwrap();
            assert_eq!(bytes, b"collections:\n");
        }

        #[tokio::test]
        async fn missing_file_is_not_found() {
            let forge = MockForge::new().with_branch("main");
            let result = forge.get_file_content(&repo(), "main", "nope.yml").await;
            assert!(matches!(result, Err(ForgeError::NotFound(_))));
        }

        #[tokio::test]
        async fn list_directory_children() {
            let forge = MockForge::new()
                .with_file("main", "posts/b.json", "{}")
                .with_file("main", "posts/a.json", "{}")
                .with_file("main", "posts/drafts/c.json", "{}");
            let entries = forge.list_directory(&repo(), "main", "posts").await.unwrap();
            let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["a.json", "b.json", "drafts"]);
            assert_eq!(entries[0].path, "posts/a.json");
            assert_eq!(entries[2].kind, EntryKind::Dir);
        }

        #[tokio::test]
        async fn list_directory_errors() {
            let forge = MockForge::new()
                .with_file("main", "README.md", "hi")
                .with_empty_dir("main", "empty");

            assert!(matches!(
                forge.list_directory(&repo(), "main", "README.md").await,
                Err(ForgeError::NotADirectory(_))
            ));
            assert!(matches!(
                forge.list_directory(&repo(), "main", "missing").await,
                Err(ForgeError::NotFound(_))
            ));
            assert!(forge
                .list_directory(&repo(), "main", "empty")
                .await
                .unwrap()
                .is_empty());
        }

        #[tokio::test]
        async fn fail_on_listing_path() {
            let forge = MockForge::new()
                .with_file("main", "a/x.json", "{}")
                .with_file("main", "b/y.json", "{}")
                .fail_on(FailOn::ListDirectoryAt("a".into(), ForgeError::RateLimited));
            assert_eq!(
                forge.list_directory(&repo(), "main", "a").await,
                Err(ForgeError::RateLimited)
            );
            assert!(forge.list_directory(&repo(), "main", "b").await.is_ok());
        }
    }

    mod branches {
        use super::*;

        #[tokio::test]
        async fn create_branch_copies_files() {
            let forge = MockForge::new().with_file("main", "posts/a.json", "{}");
            let head = forge.get_branch_head(&repo(), "main").await.unwrap();
            forge.create_branch(&repo(), "feature", &head).await.unwrap();

            assert_eq!(forge.branch_head("feature"), Some(head));
            assert!(forge.file("feature", "posts/a.json").is_some());
        }

        #[tokio::test]
        async fn create_existing_branch_conflicts() {
            let forge = MockForge::new().with_branch("main");
            let head = forge.branch_head("main").unwrap();
            let result = forge.create_branch(&repo(), "main", &head).await;
            assert!(matches!(result, Err(ForgeError::Conflict(_))));
        }

        #[tokio::test]
        async fn create_file_conflicts_on_existing_path() {
            let forge = MockForge::new().with_file("main", "posts/a.json", "{}");
            let result = forge
                .create_file(
                    &repo(),
                    CreateFileRequest {
                        branch: "main".into(),
                        path: "posts/a.json".into(),
                        content: b"{}".to_vec(),
                        message: "add".into(),
                    },
                )
                .await;
            assert!(matches!(result, Err(ForgeError::Conflict(_))));
        }

        #[tokio::test]
        async fn create_file_moves_head() {
            let forge = MockForge::new().with_branch("main");
            let before = forge.branch_head("main").unwrap();
            forge
                .create_file(
                    &repo(),
                    CreateFileRequest {
                        branch: "main".into(),
                        path: "posts/new.json".into(),
                        content: b"{}".to_vec(),
                        message: "add".into(),
                    },
                )
                .await
                .unwrap();
            assert_ne!(forge.branch_head("main").unwrap(), before);
        }
    }

    mod change_requests {
        use super::*;

        #[tokio::test]
        async fn open_and_list() {
            let forge = MockForge::new().with_branch("main").with_branch("a").with_branch("b");
            forge.open_change_request(&repo(), pr_request("a")).await.unwrap();
            forge.open_change_request(&repo(), pr_request("b")).await.unwrap();

            let prs = forge
                .list_change_requests(&repo(), PrStateFilter::Open)
                .await
                .unwrap();
            let numbers: Vec<_> = prs.iter().map(|p| p.number).collect();
            assert_eq!(numbers, vec![2, 1]);
        }

        #[tokio::test]
        async fn merge_moves_files_to_base() {
            let forge = MockForge::new()
                .with_branch("main")
                .with_file("feature", "posts/a.json", "{}");
            let pr = forge
                .open_change_request(&repo(), pr_request("feature"))
                .await
                .unwrap();

            let outcome = forge
                .merge_change_request(&repo(), pr.number, MergeMethod::Merge)
                .await
                .unwrap();
            assert!(outcome.merged);
            assert_eq!(forge.pr(pr.number).unwrap().state, PrState::Merged);
            assert!(forge.file("main", "posts/a.json").is_some());
        }

        #[tokio::test]
        async fn merge_closed_pr_conflicts() {
            let forge = MockForge::new().with_pr(sample_pr(4, "x", "main", PrState::Closed));
            let result = forge
                .merge_change_request(&repo(), 4, MergeMethod::Merge)
                .await;
            assert!(matches!(result, Err(ForgeError::Conflict(_))));
        }

        #[tokio::test]
        async fn close_missing_pr_not_found() {
            let forge = MockForge::new();
            assert!(matches!(
                forge.close_change_request(&repo(), 9).await,
                Err(ForgeError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn close_twice_conflicts() {
            let forge = MockForge::new().with_pr(sample_pr(1, "x", "main", PrState::Open));
            let closed = forge.close_change_request(&repo(), 1).await.unwrap();
            assert_eq!(closed.state, PrState::Closed);
            assert!(matches!(
                forge.close_change_request(&repo(), 1).await,
                Err(ForgeError::Conflict(_))
            ));
        }

        #[tokio::test]
        async fn with_pr_advances_numbering() {
            let forge = MockForge::new()
                .with_branch("main")
                .with_branch("a")
                .with_pr(sample_pr(41, "old", "main", PrState::Merged));
            let pr = forge.open_change_request(&repo(), pr_request("a")).await.unwrap();
            assert_eq!(pr.number, 42);
        }
    }

    #[tokio::test]
    async fn operations_are_recorded_even_on_failure() {
        let forge = MockForge::new()
            .with_branch("main")
            .fail_on(FailOn::GetBranchHead(ForgeError::RateLimited));
        assert!(forge.get_branch_head(&repo(), "main").await.is_err());
        assert_eq!(
            forge.operations(),
            vec![MockOperation::GetBranchHead {
                branch: "main".into()
            }]
        );

        forge.clear_fail_on();
        forge.clear_operations();
        assert!(forge.get_branch_head(&repo(), "main").await.is_ok());
        assert_eq!(forge.operations().len(), 1);
    }
}
