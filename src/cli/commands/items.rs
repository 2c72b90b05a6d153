//! cli::commands::items
//!
//! List a collection's items and print single files.
//!
//! # Example
//!
//! ```bash
//! # Second page of posts, with contents
//! brevoza items octocat site posts --page 2 --content
//!
//! # One file
//! brevoza show octocat site content/posts/hello.json
//! ```

use anyhow::Result;

use super::{branch_or_default, build_service, load_config, Context};
use crate::content::{ItemFile, Pagination};
use crate::service::{GetItemContentRequest, ListItemsRequest};
use crate::ui::output;

/// Arguments of the items command.
#[derive(Debug, Clone)]
pub struct ItemsArgs {
    pub owner: String,
    pub repo: String,
    pub collection: String,
    pub branch: Option<String>,
    pub page: usize,
    pub limit: Option<usize>,
    pub content: bool,
}

/// Run the items command.
pub fn items(ctx: &Context, args: ItemsArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(items_async(ctx, args))
}

async fn items_async(ctx: &Context, args: ItemsArgs) -> Result<()> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let response = service
        .list_items(ListItemsRequest {
            branch: Some(branch_or_default(args.branch, &config)),
            limit: args.limit.unwrap_or_else(|| config.default_limit()),
            page: args.page,
            include_content: args.content,
            ..ListItemsRequest::new(args.owner, args.repo, args.collection)
        })
        .await?;

    if ctx.json {
        output::print_json(&response)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    for item in &response.items {
        output::print(describe_item(item), verbosity);
        if let Some(error) = &item.error {
            output::warn(format!("{}: {}", item.path, error), verbosity);
        }
    }
    output::print(page_footer(&response.pagination), verbosity);
    Ok(())
}

fn describe_item(item: &ItemFile) -> String {
    match &item.content {
        Some(content) => format!("{}\n{}", item.path, content.trim_end()),
        None => item.path.clone(),
    }
}

fn page_footer(p: &Pagination) -> String {
    let mut footer = format!(
        "page {} of {} ({} items)",
        p.page,
        p.total_pages.max(1),
        p.total_count
    );
    if p.has_next_page {
        footer.push_str(&format!(", next: --page {}", p.page + 1));
    }
    footer
}

/// Run the show command.
pub fn show(
    ctx: &Context,
    owner: &str,
    repo: &str,
    path: &str,
    branch: Option<String>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(show_async(ctx, owner, repo, path, branch))
}

async fn show_async(
    ctx: &Context,
    owner: &str,
    repo: &str,
    path: &str,
    branch: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let service = build_service(&config)?;

    let item = service
        .get_item_content(GetItemContentRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
            branch: Some(branch_or_default(branch, &config)),
        })
        .await?;

    if ctx.json {
        output::print_json(&item)?;
    } else {
        // File content is the result itself, so quiet mode still prints it.
        print!("{}", item.content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_mentions_next_page() {
        let p = Pagination::new(1, 5, 12).unwrap();
        assert_eq!(page_footer(&p), "page 1 of 3 (12 items), next: --page 2");

        let p = Pagination::new(3, 5, 12).unwrap();
        assert_eq!(page_footer(&p), "page 3 of 3 (12 items)");
    }

    #[test]
    fn footer_for_empty_collection() {
        let p = Pagination::new(1, 5, 0).unwrap();
        assert_eq!(page_footer(&p), "page 1 of 1 (0 items)");
    }

    #[test]
    fn item_with_content() {
        let item = ItemFile::new("a.json", "posts/a.json").with_content("{}\n".into());
        assert_eq!(describe_item(&item), "posts/a.json\n{}");
        assert_eq!(
            describe_item(&ItemFile::new("b.json", "posts/b.json")),
            "posts/b.json"
        );
    }
}
