//! Terminal rendering of store activity and results

use ocldm_store::{Action, Severity, Store};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Line shown for an action, if it is user-visible.
pub fn render_action(action: &Action) -> Option<String> {
    match action {
        Action::UpsertNotification { id, message } => Some(format!("[{}] {}", id, message)),
        Action::DeleteNotification(id) => Some(format!("[{}] done", id)),
        Action::ShowToast(toast) => Some(match toast.severity {
            Severity::Error => format!("error: {}", toast.message),
            Severity::Warning => format!("warning: {}", toast.message),
            Severity::Success => toast.message.clone(),
        }),
        _ => None,
    }
}

/// Print notifications and toasts to stderr as the store dispatches them.
///
/// The task ends once the store is dropped.
pub fn spawn_renderer(store: &Store) -> JoinHandle<()> {
    let mut actions = store.subscribe();
    tokio::spawn(async move {
        loop {
            match actions.recv().await {
                Ok(action) => {
                    if let Some(line) = render_action(&action) {
                        eprintln!("{}", line);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// One tab-separated line per concept: id, display name, URL.
pub fn concept_line(concept: &Value) -> String {
    let field = |name: &str| concept.get(name).and_then(Value::as_str).unwrap_or("-");
    format!("{}\t{}\t{}", field("id"), field("display_name"), field("url"))
}

/// One tab-separated line per source: id, name, URL.
pub fn source_line(source: &Value) -> String {
    let field = |name: &str| source.get(name).and_then(Value::as_str).unwrap_or("-");
    let name = source
        .get("full_name")
        .and_then(Value::as_str)
        .unwrap_or_else(|| field("name"));
    format!("{}\t{}\t{}", field("id"), name, field("url"))
}
