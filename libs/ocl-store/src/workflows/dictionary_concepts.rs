//! Saving edited concepts
//!
//! Create and update run inside an `IsFetching` bracket. An invalid form is
//! reported with a toast and never reaches the service.

use crate::actions::{Action, Toast};
use crate::error::{Error, Result};
use crate::store::Dispatch;
use crate::workflows::workflow_error_toast;
use ocldm_client::TerminologyApi;
use ocldm_forms::ConceptForm;
use ocldm_models::{Concept, ConceptPath};
use serde_json::Value;

/// Create the form's concept in `source_url`, then its mappings.
///
/// Dispatches `CreateNewConcept` with the created concept, its new mappings
/// attached under `mappings`. Completed steps are marked on the form: if a
/// mapping fails, the concept that was created is still dispatched and
/// calling again only creates the mappings that are missing.
pub async fn create_concept(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    source_url: &str,
    form: &mut ConceptForm,
) -> Result<Value> {
    check(store, form)?;

    store.dispatch(Action::IsFetching(true));
    let result = create_with_mappings(api, store, source_url, form).await;
    match &result {
        Ok(concept) => {
            tracing::info!(id = %form.id, %source_url, "concept created");
            store.dispatch(Action::CreateNewConcept(concept.clone()));
        }
        Err(err) => {
            tracing::warn!(id = %form.id, error = %err, "creating concept failed");
            store.dispatch(Action::ShowToast(workflow_error_toast(err)));
        }
    }
    store.dispatch(Action::IsFetching(false));
    result
}

async fn create_with_mappings(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    source_url: &str,
    form: &mut ConceptForm,
) -> Result<Value> {
    let (mut concept, concept_url) = match form.concept_url().map(str::to_string) {
        Some(concept_url) => {
            tracing::debug!(%concept_url, "concept already created, resuming");
            (api.fetch_concept(&concept_url).await?, concept_url)
        }
        None => {
            let created = api.create_concept(source_url, &form.to_concept_body()).await?;
            let concept_url = Concept::from_value(created.clone())?
                .require_url()?
                .to_string();
            form.mark_created(concept_url.clone());
            (created, concept_url)
        }
    };

    let mut mappings = Vec::new();
    for (row_id, body) in form.new_mappings(&concept_url) {
        match api.create_mapping(source_url, &body).await {
            Ok(mapping) => {
                form.mark_mapping_saved(&row_id, mapping_url(&mapping));
                mappings.push(mapping);
            }
            Err(err) => {
                attach_mappings(&mut concept, mappings);
                store.dispatch(Action::CreateNewConcept(concept));
                return Err(err.into());
            }
        }
    }
    attach_mappings(&mut concept, mappings);
    Ok(concept)
}

fn attach_mappings(concept: &mut Value, mappings: Vec<Value>) {
    if mappings.is_empty() {
        return;
    }
    match concept.get_mut("mappings").and_then(Value::as_array_mut) {
        Some(existing) => existing.extend(mappings),
        None => concept["mappings"] = Value::Array(mappings),
    }
}

fn mapping_url(mapping: &Value) -> Option<String> {
    mapping.get("url").and_then(Value::as_str).map(str::to_string)
}

/// Save an edited concept.
///
/// Updates the concept document, deletes the descriptions and mappings the
/// user removed, and creates the mappings the user added. Dispatches
/// `UpdateConcept`, then one removal action per deleted item. Each item
/// leaves the form's queues once the service has it, so after a failure
/// saving again does not repeat finished deletes or creates.
pub async fn update_concept(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    concept_url: &str,
    form: &mut ConceptForm,
) -> Result<Value> {
    check(store, form)?;

    store.dispatch(Action::IsFetching(true));
    let result = save_edits(api, store, concept_url, form).await;
    if let Err(err) = &result {
        tracing::warn!(%concept_url, error = %err, "updating concept failed");
        store.dispatch(Action::ShowToast(workflow_error_toast(err)));
    }
    store.dispatch(Action::IsFetching(false));
    result
}

async fn save_edits(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    concept_url: &str,
    form: &mut ConceptForm,
) -> Result<Value> {
    let source_url = ConceptPath::parse(concept_url)?.source_url();
    let updated = api.update_concept(concept_url, &form.to_concept_body()).await?;
    tracing::info!(%concept_url, "concept updated");
    store.dispatch(Action::UpdateConcept(updated.clone()));

    for description in form.removed_descriptions().to_vec() {
        api.delete_description(concept_url, &description.uuid).await?;
        form.mark_description_deleted(&description.uuid);
        store.dispatch(Action::RemoveDescription(description.uuid));
    }
    for url in form.removed_mappings().to_vec() {
        api.delete_mapping(&url).await?;
        form.mark_mapping_deleted(&url);
        store.dispatch(Action::RemoveMapping(url));
    }
    for (row_id, body) in form.new_mappings(concept_url) {
        let created = api.create_mapping(&source_url, &body).await?;
        form.mark_mapping_saved(&row_id, mapping_url(&created));
    }
    Ok(updated)
}

/// Delete one persisted description.
pub async fn remove_description(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    concept_url: &str,
    uuid: &str,
) -> Result<()> {
    match api.delete_description(concept_url, uuid).await {
        Ok(()) => {
            store.dispatch(Action::RemoveDescription(uuid.to_string()));
            Ok(())
        }
        Err(err) => {
            let err = Error::from(err);
            store.dispatch(Action::ShowToast(workflow_error_toast(&err)));
            Err(err)
        }
    }
}

/// Delete one persisted mapping.
pub async fn remove_mapping(
    api: &dyn TerminologyApi,
    store: &dyn Dispatch,
    mapping_url: &str,
) -> Result<()> {
    match api.delete_mapping(mapping_url).await {
        Ok(()) => {
            store.dispatch(Action::RemoveMapping(mapping_url.to_string()));
            Ok(())
        }
        Err(err) => {
            let err = Error::from(err);
            store.dispatch(Action::ShowToast(workflow_error_toast(&err)));
            Err(err)
        }
    }
}

fn check(store: &dyn Dispatch, form: &ConceptForm) -> Result<()> {
    form.validate().map_err(|err| {
        store.dispatch(Action::ShowToast(Toast::error(err.to_string())));
        Error::from(err)
    })
}
