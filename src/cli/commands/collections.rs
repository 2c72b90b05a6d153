//! cli::commands::collections
//!
//! Show the collections a repository declares, with their schemas.
//!
//! # Example
//!
//! ```bash
//! brevoza collections octocat site
//! brevoza schema octocat site posts
//! ```

use anyhow::Result;

use super::{branch_or_default, build_service, load_config, Context};
use crate::content::CollectionSchema;
use crate::service::{CollectionSummary, ListCollectionsRequest};
use crate::ui::output;

/// Run the collections command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn collections(ctx: &Context, owner: &str, repo: &str, branch: Option<String>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(collections_async(ctx, owner, repo, branch))
}

async fn collections_async(
    ctx: &Context,
    owner: &str,
    repo: &str,
    branch: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let service = build_service(&config)?;
    let branch = branch_or_default(branch, &config);

    let summaries = service
        .list_collections(ListCollectionsRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: Some(branch.clone()),
        })
        .await?;

    if ctx.json {
        output::print_json(&summaries)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    if summaries.is_empty() {
        output::print(
            format!("No collections declared in {}/{} ({}).", owner, repo, branch),
            verbosity,
        );
        return Ok(());
    }
    for summary in &summaries {
        output::print(describe(summary), verbosity);
    }
    Ok(())
}

/// Run the schema command.
pub fn schema(
    ctx: &Context,
    owner: &str,
    repo: &str,
    collection: &str,
    branch: Option<String>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(schema_async(ctx, owner, repo, collection, branch))
}

async fn schema_async(
    ctx: &Context,
    owner: &str,
    repo: &str,
    collection: &str,
    branch: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let service = build_service(&config)?;
    let branch = branch_or_default(branch, &config);

    let schema = service
        .get_schema(owner, repo, Some(&branch), collection)
        .await?;

    if ctx.json {
        output::print_json(&schema)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    output::print(format!("{} ({})", collection, branch), verbosity);
    output::print(describe_schema(collection, &schema), verbosity);
    Ok(())
}

fn describe(summary: &CollectionSummary) -> String {
    let mut text = match &summary.config_path {
        Some(path) => format!("{} ({})", summary.name, path),
        None => summary.name.clone(),
    };
    if let Some(error) = &summary.error {
        text.push_str(&format!("\n  error: {}", error));
    }
    if let Some(schema) = &summary.schema {
        text.push('\n');
        text.push_str(&describe_schema(summary.name.as_str(), schema));
    }
    text
}

fn describe_schema(collection: &str, schema: &CollectionSchema) -> String {
    let mut lines: Vec<String> = schema
        .properties
        .iter()
        .map(|(name, field)| {
            let required = if schema.required.iter().any(|r| r == name) {
                " (required)"
            } else {
                ""
            };
            let mut line = format!(
                "  {}: {} [{}]{}",
                name,
                field.field_type,
                field.field_type.input_kind(),
                required
            );
            if let Some(description) = &field.description {
                line.push_str(&format!(" - {}", description));
            }
            line
        })
        .collect();

    let undeclared = schema.undeclared_required();
    if !undeclared.is_empty() {
        lines.push(format!("  required but not declared: {}", undeclared.join(", ")));
    }

    let storage = &schema.storage;
    lines.push(format!(
        "  storage: {} ({}, id field '{}')",
        storage.directory(collection),
        storage.format,
        storage.id_field
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_schema;

    #[test]
    fn describes_fields_and_storage() {
        let schema = parse_schema(
            "schema:\n  properties:\n    title:\n      type: string\n    body:\n      type: markdown\n      description: Main text\n  required: [title]\n",
        );
        let text = describe_schema("posts", &schema);
        assert_eq!(
            text,
            "  title: string [single-line] (required)\n  \
             body: markdown [multi-line] - Main text\n  \
             storage: posts/ (json, id field 'id')"
        );
    }

    #[test]
    fn lists_undeclared_required_fields() {
        let schema = parse_schema(
            "schema:\n  properties:\n    title:\n  required:\n    - title\n    - slug\n    - date\n",
        );
        let text = describe_schema("posts", &schema);
        assert_eq!(
            text,
            "  title: string [single-line] (required)\n  \
             required but not declared: slug, date\n  \
             storage: posts/ (json, id field 'id')"
        );
    }

    #[test]
    fn describes_errors() {
        let summary = CollectionSummary {
            name: "pages".into(),
            config_path: None,
            schema: None,
            error: Some("no config file specified for this collection".into()),
        };
        assert_eq!(
            describe(&summary),
            "pages\n  error: no config file specified for this collection"
        );
    }
}
