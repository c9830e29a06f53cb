//! Bulk import of existing concepts into a dictionary
//!
//! Adding a batch runs Discovering → Counting → Submitting, strictly in
//! order, with the batch's progress notification rewritten at each phase.
//! Dependent lookups inside the discovering phase run concurrently, at most
//! [`LOOKUP_CONCURRENCY`] at a time.

use crate::actions::{Action, Fetched, NotificationId, Toast};
use crate::error::Result;
use crate::store::Dispatch;
use crate::workflows::workflow_error_toast;
use futures::stream::{self, StreamExt};
use ocldm_client::TerminologyApi;
use ocldm_models::{expressions_of, is_dependent_map_type, Concept};
use serde_json::Value;
use std::collections::HashSet;

pub const FETCH_SOURCES_FALLBACK: &str = "Failed to fetch source concepts";

/// Concept lookups in flight at once while finding dependents.
pub const LOOKUP_CONCURRENCY: usize = 8;

const NAVIGATION_WARNING: &str =
    "\n\nPlease keep this page open until the concepts have been added.";

/// A batch of concept references to add to one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAddRequest {
    /// References endpoint of the target collection.
    pub url: String,
    pub expressions: Vec<String>,
    /// Only used to label the batch's notification.
    pub concept_id_list: Vec<String>,
}

impl BulkAddRequest {
    pub fn new(url: impl Into<String>, expressions: Vec<String>, concept_id_list: Vec<String>) -> Self {
        Self {
            url: url.into(),
            expressions,
            concept_id_list,
        }
    }

    /// Build from a reference-creation body (`{"data": {"expressions": [...]}}`).
    pub fn from_body(url: impl Into<String>, body: &Value, concept_id_list: Vec<String>) -> Self {
        Self::new(url, expressions_of(body), concept_id_list)
    }

    pub fn notification_id(&self) -> NotificationId {
        NotificationId::adding(&self.concept_id_list)
    }

    fn ids_label(&self) -> String {
        self.concept_id_list.join(",")
    }
}

/// What a successful batch added.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAddOutcome {
    /// Response of the references endpoint.
    pub added: Value,
    /// Dependent references submitted along with the batch.
    pub dependents: Vec<String>,
}

/// List the sources concepts can be imported from.
///
/// Dispatches `ClearSourceConcepts`, `IsFetching(true)`, then
/// `FetchConceptSources(Loaded)` or `FetchConceptSources(Failed)` plus an error
/// toast, then `IsFetching(false)`.
pub async fn fetch_concept_sources(api: &dyn TerminologyApi, store: &dyn Dispatch) {
    store.dispatch(Action::ClearSourceConcepts);
    store.dispatch(Action::IsFetching(true));
    match api.fetch_concept_sources().await {
        Ok(sources) => {
            tracing::debug!(count = sources.len(), "concept sources fetched");
            store.dispatch(Action::FetchConceptSources(Fetched::Loaded(sources)));
        }
        Err(err) => {
            let message = err.message().resolve(FETCH_SOURCES_FALLBACK);
            tracing::warn!(error = %err, %message, "fetching concept sources failed");
            store.dispatch(Action::FetchConceptSources(Fetched::Failed(message.clone())));
            store.dispatch(Action::ShowToast(Toast::error(message)));
        }
    }
    store.dispatch(Action::IsFetching(false));
}

/// Search the public concepts of a source (CIEL by default in the UI).
///
/// Dispatches `ClearSourceConcepts`, `IsLoading(true)`,
/// `FetchSourceConcepts` with the concepts or the raw error body, then
/// `IsLoading(false)`.
pub async fn fetch_source_concepts(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    source_url: &str,
    query: &str,
    limit: u32,
) {
    store.dispatch(Action::ClearSourceConcepts);
    store.dispatch(Action::IsLoading(true));
    let result = match api.search_source_concepts(source_url, query, limit).await {
        Ok(concepts) => Fetched::Loaded(concepts),
        Err(err) => {
            tracing::warn!(%source_url, %query, error = %err, "source concept search failed");
            Fetched::Failed(err.data().cloned().unwrap_or(Value::String(err.to_string())))
        }
    };
    store.dispatch(Action::FetchSourceConcepts(result));
    store.dispatch(Action::IsLoading(false));
}

/// Add a batch of existing concepts, together with the concepts they depend
/// on, to a collection.
///
/// A failed dependent lookup contributes nothing. A failed submit returns the
/// error and leaves the batch's notification in place; resubmitting the same
/// batch is safe.
pub async fn add_existing_bulk_concepts(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    request: &BulkAddRequest,
) -> Result<BulkAddOutcome> {
    let id = request.notification_id();
    let ids = request.ids_label();
    tracing::info!(
        notification = %id,
        expressions = request.expressions.len(),
        target = %request.url,
        "adding concepts"
    );

    store.dispatch(Action::UpsertNotification {
        id: id.clone(),
        message: progress_message(&ids, "Finding dependent concepts..."),
    });

    let dependents = resolve_dependent_concepts(api, &request.expressions).await;
    let count = dependents.len();

    store.dispatch(Action::UpsertNotification {
        id: id.clone(),
        message: progress_message(&ids, &format!("Found {} dependent concepts to add...", count)),
    });
    store.dispatch(Action::UpsertNotification {
        id: id.clone(),
        message: progress_message(
            &ids,
            &format!("Adding these and {} dependent concepts...", count),
        ),
    });

    let mut expressions = request.expressions.clone();
    expressions.extend(dependents.iter().cloned());

    let added = match api.add_references(&request.url, &expressions).await {
        Ok(added) => added,
        Err(err) => {
            tracing::error!(notification = %id, error = %err, "adding concepts failed");
            return Err(err.into());
        }
    };

    tracing::info!(notification = %id, dependents = count, "concepts added");
    store.dispatch(Action::AddExistingBulkConcepts(added.clone()));
    store.dispatch(Action::DeleteNotification(id));

    Ok(BulkAddOutcome { added, dependents })
}

/// Look up every expression and collect the references its dependent
/// mappings point at, skipping anything already in `expressions`.
///
/// Results keep the order of first appearance.
pub async fn resolve_dependent_concepts(
    api: &dyn TerminologyApi,
    expressions: &[String],
) -> Vec<String> {
    let results: Vec<_> = stream::iter(expressions)
        .map(|expression| async move { (expression, api.fetch_concept(expression).await) })
        .buffered(LOOKUP_CONCURRENCY)
        .collect()
        .await;

    let mut seen: HashSet<String> = expressions.iter().map(|e| reference_key(e)).collect();
    let mut dependents = Vec::new();
    for (expression, result) in results {
        match result {
            Ok(concept) => {
                for url in dependent_urls(concept) {
                    if seen.insert(reference_key(&url)) {
                        dependents.push(url);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%expression, error = %err, "dependent lookup failed, skipping");
            }
        }
    }
    dependents
}

/// Targets of a concept's answer and set-member mappings.
pub fn dependent_urls(concept: Value) -> Vec<String> {
    match Concept::from_value(concept) {
        Ok(concept) => concept
            .mappings
            .into_iter()
            .filter(|m| is_dependent_map_type(&m.map_type))
            .filter_map(|m| m.to_concept_url)
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "unreadable concept, no dependents");
            Vec::new()
        }
    }
}

/// Add one concept to a dictionary.
///
/// Fetches the concept for its canonical URL, posts it to
/// `<owner_url>collections/<dictionary_id>/references/`, and dispatches one
/// `AddExistingBulkConcepts`. Failures show an error toast.
pub async fn add_dictionary_reference(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    concept_url: &str,
    owner_url: &str,
    dictionary_id: &str,
) -> Result<Value> {
    let result: Result<Value> = async {
        let concept = api.fetch_concept(concept_url).await?;
        let canonical = concept
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or(concept_url)
            .to_string();
        Ok(api
            .add_dictionary_references(owner_url, dictionary_id, &[canonical])
            .await?)
    }
    .await;

    match result {
        Ok(added) => {
            tracing::info!(%concept_url, %dictionary_id, "reference added");
            store.dispatch(Action::AddExistingBulkConcepts(added.clone()));
            Ok(added)
        }
        Err(err) => {
            tracing::warn!(%concept_url, %dictionary_id, error = %err, "adding reference failed");
            store.dispatch(Action::ShowToast(workflow_error_toast(&err)));
            Err(err)
        }
    }
}

fn progress_message(ids: &str, phase: &str) -> String {
    format!("Adding {}\n\n{}{}", ids, phase, NAVIGATION_WARNING)
}

/// Comparison key for references: trailing slashes are not significant.
fn reference_key(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
