//! Concept search

use crate::actions::Action;
use crate::store::Dispatch;
use crate::workflows::request_error_toast;
use ocldm_client::{ConceptQuery, TerminologyApi};

/// Search concepts and publish the result.
///
/// Dispatches `IsFetching(true)`, then `FetchConcepts` or one error toast,
/// then `IsFetching(false)`. Failures never escape as errors.
pub async fn fetch_concepts(api: &dyn TerminologyApi, store: &dyn Dispatch, query: &ConceptQuery) {
    store.dispatch(Action::IsFetching(true));
    match api.search_concepts(query).await {
        Ok(concepts) => {
            tracing::debug!(query = %query.query, count = concepts.len(), "concepts fetched");
            store.dispatch(Action::FetchConcepts(concepts));
        }
        Err(err) => {
            tracing::warn!(query = %query.query, error = %err, "concept search failed");
            store.dispatch(Action::ShowToast(request_error_toast(&err)));
        }
    }
    store.dispatch(Action::IsFetching(false));
}
