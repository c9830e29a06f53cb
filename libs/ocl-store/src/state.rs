//! State slices and the reducer

use crate::actions::{Action, Fetched, NotificationId, Toast};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingState {
    pub is_fetching: bool,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptsState {
    /// Last concept search result.
    pub concepts: Vec<Value>,
    pub source_concepts: Vec<Value>,
    /// Raw error body of the last failed source search.
    pub source_concepts_error: Option<Value>,
    pub concept_sources: Vec<Value>,
    pub concept_sources_error: Option<String>,
    /// Payloads of every successful reference addition.
    pub added_references: Vec<Value>,
    /// Concept created or updated last.
    pub current_concept: Option<Value>,
}

/// Keyed progress messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationState {
    pub messages: BTreeMap<NotificationId, String>,
}

impl NotificationState {
    pub fn get(&self, id: &NotificationId) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastState {
    pub last: Option<Toast>,
    pub shown: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub loading: LoadingState,
    pub concepts: ConceptsState,
    pub notifications: NotificationState,
    pub toasts: ToastState,
}

/// Apply one action. Deterministic and free of I/O.
pub fn reduce(state: &mut State, action: &Action) {
    match action {
        Action::IsFetching(flag) => state.loading.is_fetching = *flag,
        Action::IsLoading(flag) => state.loading.is_loading = *flag,
        Action::FetchConcepts(concepts) => state.concepts.concepts = concepts.clone(),
        Action::ClearSourceConcepts => {
            state.concepts.source_concepts.clear();
            state.concepts.source_concepts_error = None;
        }
        Action::FetchSourceConcepts(result) => match result {
            Fetched::Loaded(items) => {
                state.concepts.source_concepts = items.clone();
                state.concepts.source_concepts_error = None;
            }
            Fetched::Failed(data) => state.concepts.source_concepts_error = Some(data.clone()),
        },
        Action::FetchConceptSources(result) => match result {
            Fetched::Loaded(items) => {
                state.concepts.concept_sources = items.clone();
                state.concepts.concept_sources_error = None;
            }
            Fetched::Failed(message) => {
                state.concepts.concept_sources_error = Some(message.clone())
            }
        },
        Action::AddExistingBulkConcepts(payload) => match payload {
            Value::Array(items) => state.concepts.added_references.extend(items.iter().cloned()),
            other => state.concepts.added_references.push(other.clone()),
        },
        Action::CreateNewConcept(concept) | Action::UpdateConcept(concept) => {
            state.concepts.current_concept = Some(concept.clone())
        }
        Action::RemoveDescription(uuid) => {
            remove_from_current(state, "descriptions", "uuid", uuid);
        }
        Action::RemoveMapping(url) => {
            remove_from_current(state, "mappings", "url", url);
        }
        Action::UpsertNotification { id, message } => {
            state
                .notifications
                .messages
                .insert(id.clone(), message.clone());
        }
        Action::DeleteNotification(id) => {
            state.notifications.messages.remove(id);
        }
        Action::ShowToast(toast) => {
            state.toasts.last = Some(toast.clone());
            state.toasts.shown += 1;
        }
    }
}

fn remove_from_current(state: &mut State, collection: &str, key: &str, value: &str) {
    if let Some(items) = state
        .concepts
        .current_concept
        .as_mut()
        .and_then(|c| c.get_mut(collection))
        .and_then(Value::as_array_mut)
    {
        items.retain(|item| item.get(key).and_then(Value::as_str) != Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(actions: &[Action]) -> State {
        let mut state = State::default();
        for action in actions {
            reduce(&mut state, action);
        }
        state
    }

    #[test]
    fn loading_flags_are_last_writer_wins() {
        let state = apply(&[
            Action::IsFetching(true),
            Action::IsLoading(true),
            Action::IsFetching(false),
        ]);
        assert!(!state.loading.is_fetching);
        assert!(state.loading.is_loading);
    }

    #[test]
    fn notifications_upsert_and_delete() {
        let id = NotificationId::adding(&[123]);
        let state = apply(&[
            Action::UpsertNotification {
                id: id.clone(),
                message: "one".into(),
            },
            Action::UpsertNotification {
                id: id.clone(),
                message: "two".into(),
            },
        ]);
        assert_eq!(state.notifications.get(&id), Some("two"));
        assert_eq!(state.notifications.messages.len(), 1);

        let mut state = state;
        reduce(&mut state, &Action::DeleteNotification(id.clone()));
        assert!(state.notifications.get(&id).is_none());
    }

    #[test]
    fn clear_source_concepts_resets_errors() {
        let state = apply(&[
            Action::FetchSourceConcepts(Fetched::Failed(json!("nope"))),
            Action::ClearSourceConcepts,
        ]);
        assert!(state.concepts.source_concepts_error.is_none());
        assert!(state.concepts.source_concepts.is_empty());
    }

    #[test]
    fn failed_source_fetch_keeps_previous_sources() {
        let state = apply(&[
            Action::FetchConceptSources(Fetched::Loaded(vec![json!({"id": "CIEL"})])),
            Action::FetchConceptSources(Fetched::Failed("down".into())),
        ]);
        assert_eq!(state.concepts.concept_sources.len(), 1);
        assert_eq!(state.concepts.concept_sources_error.as_deref(), Some("down"));
    }

    #[test]
    fn bulk_results_accumulate() {
        let state = apply(&[
            Action::AddExistingBulkConcepts(json!([{"added": true}, {"added": false}])),
            Action::AddExistingBulkConcepts(json!({"added": true})),
        ]);
        assert_eq!(state.concepts.added_references.len(), 3);
    }

    #[test]
    fn removals_edit_current_concept() {
        let state = apply(&[
            Action::CreateNewConcept(json!({
                "descriptions": [{"uuid": "a"}, {"uuid": "b"}],
                "mappings": [{"url": "/m/1/"}, {"url": "/m/2/"}]
            })),
            Action::RemoveDescription("a".into()),
            Action::RemoveMapping("/m/2/".into()),
        ]);
        let concept = state.concepts.current_concept.unwrap();
        assert_eq!(concept["descriptions"], json!([{"uuid": "b"}]));
        assert_eq!(concept["mappings"], json!([{"url": "/m/1/"}]));
    }

    #[test]
    fn toasts_are_counted() {
        let state = apply(&[
            Action::ShowToast(Toast::error("a")),
            Action::ShowToast(Toast::error("b")),
        ]);
        assert_eq!(state.toasts.shown, 2);
        assert_eq!(state.toasts.last.unwrap().message, "b");
    }
}
