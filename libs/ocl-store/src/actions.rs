//! Typed state transitions
//!
//! The ordered sequence of actions a workflow dispatches is its observable
//! contract, so every transition the UI reacts to is an [`Action`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// How long error toasts stay on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Result of a list fetch: the items, or what the failure left behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fetched<E> {
    Loaded(Vec<Value>),
    Failed(E),
}

/// Id of a keyed progress notification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl NotificationId {
    /// `adding-<ids>` for a bulk-add batch, ids joined by commas.
    pub fn adding<T: fmt::Display>(concept_ids: &[T]) -> Self {
        let ids: Vec<String> = concept_ids.iter().map(ToString::to_string).collect();
        Self(format!("adding-{}", ids.join(",")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Ad-hoc message shown for a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

impl Toast {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            duration: TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            duration: TOAST_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    IsFetching(bool),
    IsLoading(bool),
    FetchConcepts(Vec<Value>),
    ClearSourceConcepts,
    /// Source search result, or the raw error body.
    FetchSourceConcepts(Fetched<Value>),
    /// Concept sources, or the resolved error message.
    FetchConceptSources(Fetched<String>),
    AddExistingBulkConcepts(Value),
    CreateNewConcept(Value),
    UpdateConcept(Value),
    /// Description uuid removed from the current concept.
    RemoveDescription(String),
    /// Mapping URL removed from the current concept.
    RemoveMapping(String),
    UpsertNotification {
        id: NotificationId,
        message: String,
    },
    DeleteNotification(NotificationId),
    ShowToast(Toast),
}

impl Action {
    /// Stable name of the transition, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::IsFetching(_) => "IS_FETCHING",
            Action::IsLoading(_) => "IS_LOADING",
            Action::FetchConcepts(_) => "FETCH_CONCEPTS",
            Action::ClearSourceConcepts => "CLEAR_SOURCE_CONCEPTS",
            Action::FetchSourceConcepts(_) => "FETCH_SOURCE_CONCEPTS",
            Action::FetchConceptSources(_) => "FETCH_CONCEPT_SOURCES",
            Action::AddExistingBulkConcepts(_) => "ADD_EXISTING_BULK_CONCEPTS",
            Action::CreateNewConcept(_) => "CREATE_NEW_CONCEPT",
            Action::UpdateConcept(_) => "UPDATE_CONCEPT",
            Action::RemoveDescription(_) => "REMOVE_DESCRIPTION",
            Action::RemoveMapping(_) => "REMOVE_MAPPING",
            Action::UpsertNotification { .. } => "UPSERT_NOTIFICATION",
            Action::DeleteNotification(_) => "DELETE_NOTIFICATION",
            Action::ShowToast(_) => "SHOW_TOAST",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_id_joins_ids() {
        assert_eq!(NotificationId::adding(&[123]).as_str(), "adding-123");
        assert_eq!(NotificationId::adding(&["A15.1", "A15.2"]).as_str(), "adding-A15.1,A15.2");
    }

    #[test]
    fn error_toast_defaults() {
        let toast = Toast::error("Request can't be made");
        assert_eq!(toast.severity.as_str(), "error");
        assert_eq!(toast.duration.as_millis(), 3000);
    }

    #[test]
    fn action_kinds() {
        assert_eq!(Action::IsFetching(true).kind(), "IS_FETCHING");
        assert_eq!(
            Action::AddExistingBulkConcepts(Value::Null).kind(),
            "ADD_EXISTING_BULK_CONCEPTS"
        );
    }
}
