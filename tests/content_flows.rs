//! End-to-end read and write flows through the public API, backed by
//! `MockForge`.

use std::sync::Arc;

use brevoza::content::{parse_collections, parse_schema, CollectionEntry, FieldType};
use brevoza::core::ErrorKind;
use brevoza::forge::mock::{FailOn, MockForge, MockOperation};
use brevoza::forge::{ForgeError, PrStateFilter};
use brevoza::service::{
    ContentService, CreateProposalRequest, ListItemsRequest, ListProposalsRequest,
    ModerationRequest,
};
use proptest::prelude::*;
use serde_json::json;

const ROOT: &str = "\
site:
  title: Example
collections:
  posts:
    config: schemas/posts.yml
  pages:
    settings: { config: schemas/pages.yml }
";

const POSTS: &str = "\
schema:
  properties:
    title:
      type: string
    published:
      type: date
  required:
    - title
storage:
  path: posts/
  format: json
";

fn site() -> MockForge {
    let mut forge = MockForge::new()
        .with_file("main", "brevoza.config.yml", ROOT)
        .with_file("main", "schemas/posts.yml", POSTS);
    for n in 1..=12 {
        forge = forge.with_file(
            "main",
            &format!("posts/{:02}.json", n),
            format!("{{\"id\":\"{:02}\"}}", n),
        );
    }
    forge
}

fn list_request(page: usize, limit: usize) -> ListItemsRequest {
    let mut request = ListItemsRequest::new("octocat", "site", "posts");
    request.page = page;
    request.limit = limit;
    request
}

#[test]
fn root_config_example() {
    assert_eq!(
        parse_collections(ROOT),
        vec![
            CollectionEntry::new("posts", Some("schemas/posts.yml")),
            CollectionEntry::new("pages", Some("schemas/pages.yml")),
        ]
    );
    assert!(parse_collections("site:\n  title: x\n").is_empty());
}

#[test]
fn schema_example() {
    let schema = parse_schema(POSTS);
    assert_eq!(schema.properties["published"].field_type, FieldType::Date);
    assert_eq!(schema.required, vec!["title"]);
    assert_eq!(schema.storage.directory("posts"), "posts/");
}

#[tokio::test]
async fn twelve_items_in_pages_of_five() {
    let forge = site();
    let service = ContentService::new(Arc::new(forge.clone()));

    let first = service.list_items(list_request(1, 5)).await.unwrap();
    let ids: Vec<_> = first.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(ids, vec!["01.json", "02.json", "03.json", "04.json", "05.json"]);
    assert_eq!(first.pagination.total_pages, 3);
    assert!(first.pagination.has_next_page);
    assert!(!first.pagination.has_previous_page);

    let last = service.list_items(list_request(3, 5)).await.unwrap();
    let ids: Vec<_> = last.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(ids, vec!["11.json", "12.json"]);
    assert!(!last.pagination.has_next_page);
}

#[tokio::test]
async fn undecodable_content_is_replaced() {
    let forge = site().with_file("main", "posts/13.json", vec![0xff]);
    let service = ContentService::new(Arc::new(forge));
    let mut request = list_request(1, 50);
    request.include_content = true;

    let response = service.list_items(request).await.unwrap();
    assert_eq!(response.items.len(), 13);
    assert!(response.items.iter().all(|i| i.error.is_none()));
    assert_eq!(response.items[12].content.as_deref(), Some("\u{fffd}"));
}

#[tokio::test]
async fn host_failure_before_listing_is_upstream() {
    let forge = site().fail_on(FailOn::GetFileContent(ForgeError::RateLimited));
    let service = ContentService::new(Arc::new(forge));
    let err = service.list_items(list_request(1, 5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
}

#[tokio::test]
async fn propose_then_reject() {
    let forge = site();
    let service = ContentService::new(Arc::new(forge.clone()));

    let receipt = service
        .create_proposal(CreateProposalRequest {
            owner: "octocat".into(),
            repo: "site".into(),
            collection_name: "posts".into(),
            item_data: json!({ "id": "13", "title": "Thirteen" })
                .as_object()
                .cloned()
                .unwrap(),
            target_path: None,
            base_branch: None,
            branch_name: Some("add-posts-item-13".into()),
        })
        .await
        .unwrap();
    assert_eq!(receipt.target_path, "posts/13.json");

    let creates: Vec<_> = forge
        .operations()
        .into_iter()
        .filter(|op| {
            matches!(
                op,
                MockOperation::CreateBranch { .. }
                    | MockOperation::CreateFile { .. }
                    | MockOperation::OpenChangeRequest { .. }
            )
        })
        .collect();
    assert_eq!(creates.len(), 3);

    let request = ModerationRequest {
        owner: "octocat".into(),
        repo: "site".into(),
        pr_number: receipt.pr_number,
    };
    service.reject(request.clone()).await.unwrap();

    let closed = service
        .list_proposals(ListProposalsRequest {
            owner: "octocat".into(),
            repo: "site".into(),
            state: PrStateFilter::Closed,
        })
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);

    let err = service.approve(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(forge.file("main", "posts/13.json").is_none());
}

proptest! {
    #[test]
    fn collection_parsing_is_pure(names in proptest::collection::vec("[a-z][a-z0-9_-]{0,8}", 0..6)) {
        let mut text = String::from("collections:\n");
        for name in &names {
            text.push_str(&format!("  {}:\n    config: {}.yml\n", name, name));
        }
        let first = parse_collections(&text);
        let second = parse_collections(&text);
        prop_assert_eq!(&first, &second);

        prop_assert!(first.len() <= names.len());
        for entry in &first {
            prop_assert_eq!(entry.config_path.clone(), Some(format!("{}.yml", entry.name)));
        }
    }
}
