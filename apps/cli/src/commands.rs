//! Subcommand execution
//!
//! Each command runs a store workflow and returns the lines to print on
//! stdout. Progress and toasts reach the terminal through the renderer.

use anyhow::{bail, Context as _};
use ocldm_client::{ConceptQuery, TerminologyApi};
use ocldm_models::{
    map_types_for, ConceptClass, ConceptPath, DataType, OwnerType, LOCALES,
};
use ocldm_store::{bulk_concepts, specific_concept, BulkAddRequest, Severity, Store};

use crate::cli::{AddReferenceArgs, BulkAddArgs, Command, SearchArgs, SourceConceptsArgs};
use crate::config::Config;
use crate::render::{concept_line, source_line};

pub struct Context<'a> {
    pub api: &'a dyn TerminologyApi,
    pub store: &'a Store,
    pub config: &'a Config,
}

pub async fn run(command: Command, ctx: &Context<'_>) -> anyhow::Result<Vec<String>> {
    match command {
        Command::Search(args) => search(args, ctx).await,
        Command::Sources => sources(ctx).await,
        Command::SourceConcepts(args) => source_concepts(args, ctx).await,
        Command::BulkAdd(args) => bulk_add(args, ctx).await,
        Command::AddReference(args) => add_reference(args, ctx).await,
        Command::Classes => Ok(ConceptClass::ALL.iter().map(ToString::to_string).collect()),
        Command::Datatypes => Ok(DataType::ALL.iter().map(ToString::to_string).collect()),
        Command::MapTypes { source } => {
            Ok(map_types_for(&source).into_iter().map(String::from).collect())
        }
        Command::Locales => Ok(LOCALES
            .iter()
            .map(|l| format!("{}\t{}", l.value, l.label))
            .collect()),
        Command::ShowConfig => show_config(ctx.config),
    }
}

async fn search(args: SearchArgs, ctx: &Context<'_>) -> anyhow::Result<Vec<String>> {
    let limit = args.limit.unwrap_or(ctx.config.client.page_size);
    let mut query = ConceptQuery::new(args.query, limit, args.page);
    if let Some(org) = args.org {
        query = query.owned_by(org, OwnerType::Organization);
    } else if let Some(user) = args.user {
        query = query.owned_by(user, OwnerType::User);
    }

    let shown = ctx.store.state().toasts.shown;
    specific_concept::fetch_concepts(ctx.api, ctx.store, &query).await;
    fail_on_error_toast(ctx.store, shown)?;

    Ok(ctx.store.state().concepts.concepts.iter().map(concept_line).collect())
}

async fn sources(ctx: &Context<'_>) -> anyhow::Result<Vec<String>> {
    bulk_concepts::fetch_concept_sources(ctx.api, ctx.store).await;
    let state = ctx.store.state();
    if let Some(message) = state.concepts.concept_sources_error {
        bail!("Listing sources failed: {}", message);
    }
    Ok(state.concepts.concept_sources.iter().map(source_line).collect())
}

async fn source_concepts(
    args: SourceConceptsArgs,
    ctx: &Context<'_>,
) -> anyhow::Result<Vec<String>> {
    bulk_concepts::fetch_source_concepts(ctx.api, ctx.store, &args.source, &args.query, args.limit)
        .await;
    let state = ctx.store.state();
    if let Some(error) = state.concepts.source_concepts_error {
        bail!("Searching {} failed: {}", args.source, error);
    }
    Ok(state.concepts.source_concepts.iter().map(concept_line).collect())
}

async fn bulk_add(args: BulkAddArgs, ctx: &Context<'_>) -> anyhow::Result<Vec<String>> {
    let ids = if args.ids.is_empty() {
        args.concepts.iter().map(|url| concept_id(url)).collect()
    } else {
        args.ids
    };
    let request = BulkAddRequest::new(references_url(&args.collection), args.concepts, ids);

    let outcome = bulk_concepts::add_existing_bulk_concepts(ctx.api, ctx.store, &request)
        .await
        .with_context(|| format!("Adding concepts to {} failed", request.url))?;

    let mut lines = vec![format!(
        "Added {} concepts and {} dependent concepts",
        request.expressions.len(),
        outcome.dependents.len()
    )];
    lines.extend(outcome.dependents);
    Ok(lines)
}

async fn add_reference(args: AddReferenceArgs, ctx: &Context<'_>) -> anyhow::Result<Vec<String>> {
    let owner = match (args.owner, &ctx.config.client.username) {
        (Some(owner), _) => owner,
        (None, Some(username)) => format!("/users/{}/", username),
        (None, None) => bail!("No owner given and client.username is not configured"),
    };

    bulk_concepts::add_dictionary_reference(
        ctx.api,
        ctx.store,
        &args.concept_url,
        &owner,
        &args.dictionary,
    )
    .await
    .with_context(|| format!("Adding {} to {} failed", args.concept_url, args.dictionary))?;

    Ok(vec![format!("Added {} to {}", args.concept_url, args.dictionary)])
}

fn show_config(config: &Config) -> anyhow::Result<Vec<String>> {
    let mut shown = config.clone();
    if shown.client.token.is_some() {
        shown.client.token = Some("********".to_string());
    }
    Ok(vec![serde_json::to_string_pretty(&shown)?])
}

fn fail_on_error_toast(store: &Store, shown_before: usize) -> anyhow::Result<()> {
    let toasts = store.state().toasts;
    match toasts.last {
        Some(toast) if toasts.shown > shown_before && toast.severity == Severity::Error => {
            bail!("{}", toast.message)
        }
        _ => Ok(()),
    }
}

/// References endpoint for a collection URL; endpoints pass through.
pub fn references_url(collection: &str) -> String {
    if collection.trim_end_matches('/').ends_with("/references") {
        return collection.to_string();
    }
    format!("{}/references/", collection.trim_end_matches('/'))
}

/// Concept id from a concept URL, or the URL itself.
pub fn concept_id(url: &str) -> String {
    ConceptPath::parse(url)
        .map(|path| path.concept_id)
        .unwrap_or_else(|_| url.to_string())
}
