//! Concept form container
//!
//! Owns the canonical row collections of one edit session, keyed by row id,
//! and applies the messages rows emit.

use crate::description::{DescriptionMessage, DescriptionRowData, RowKind};
use crate::error::{FormError, Result};
use crate::mapping::{MappingField, MappingMessage, MappingRowData};
use ocldm_models::{
    is_internal_source, new_row_id, Concept, ConceptClass, DataType, DEFAULT_LOCALE,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

/// One localized name of the concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRowData {
    pub uuid: String,
    pub name: String,
    pub locale: String,
    pub locale_preferred: bool,
    pub name_type: String,
}

impl NameRowData {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            uuid: new_row_id(),
            name: name.into(),
            locale: locale.into(),
            locale_preferred: true,
            name_type: "FULLY_SPECIFIED".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConceptForm {
    pub id: String,
    pub concept_class: Option<ConceptClass>,
    pub datatype: Option<DataType>,
    names: Vec<NameRowData>,
    descriptions: Vec<DescriptionRowData>,
    mappings: Vec<MappingRowData>,
    /// Description ids that exist on the service.
    persisted_descriptions: HashSet<String>,
    /// Persisted descriptions the user removed; deleted on save.
    removed_descriptions: Vec<DescriptionRowData>,
    /// Persisted mappings the user removed; deleted on save.
    removed_mappings: Vec<String>,
    /// Service URL of the concept once it exists there.
    concept_url: Option<String>,
    /// Mapping rows created on the service whose response carried no URL.
    saved_mapping_rows: HashSet<String>,
}

impl ConceptForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Start an edit session for an existing concept.
    pub fn from_concept(concept: &Concept) -> Self {
        let names = concept
            .names
            .iter()
            .map(|n| NameRowData {
                uuid: n.uuid.clone().unwrap_or_else(new_row_id),
                name: n.name.clone(),
                locale: n.locale.clone(),
                locale_preferred: n.locale_preferred.unwrap_or(false),
                name_type: n.name_type.clone().unwrap_or_default(),
            })
            .collect();
        let descriptions: Vec<DescriptionRowData> = concept
            .descriptions
            .iter()
            .map(|d| DescriptionRowData {
                uuid: d.uuid.clone(),
                locale: d.locale.clone(),
                description: d.description.clone(),
            })
            .collect();
        let mappings = concept
            .mappings
            .iter()
            .map(|m| MappingRowData {
                id: new_row_id(),
                source: m.source.clone(),
                map_type: m.map_type.clone(),
                to_concept_code: m.to_concept_code.clone().unwrap_or_default(),
                to_concept_name: m.to_concept_name.clone().unwrap_or_default(),
                to_concept_url: m.to_concept_url.clone(),
                url: m.url.clone(),
            })
            .collect();

        Self {
            id: concept.id.clone().unwrap_or_default(),
            concept_class: concept.concept_class(),
            datatype: concept.data_type(),
            names,
            persisted_descriptions: descriptions.iter().map(|d| d.uuid.clone()).collect(),
            descriptions,
            mappings,
            removed_descriptions: Vec::new(),
            removed_mappings: Vec::new(),
            concept_url: concept.url.clone(),
            saved_mapping_rows: HashSet::new(),
        }
    }

    /// Service URL of the concept, once it has been created.
    pub fn concept_url(&self) -> Option<&str> {
        self.concept_url.as_deref()
    }

    pub fn names(&self) -> &[NameRowData] {
        &self.names
    }

    pub fn descriptions(&self) -> &[DescriptionRowData] {
        &self.descriptions
    }

    pub fn mappings(&self) -> &[MappingRowData] {
        &self.mappings
    }

    pub fn removed_descriptions(&self) -> &[DescriptionRowData] {
        &self.removed_descriptions
    }

    pub fn removed_mappings(&self) -> &[String] {
        &self.removed_mappings
    }

    pub fn add_name(&mut self, row: NameRowData) {
        self.names.push(row);
    }

    /// Append an empty description row and return it.
    pub fn add_description_row(&mut self, locale: &str) -> DescriptionRowData {
        let row = DescriptionRowData {
            locale: if locale.is_empty() {
                DEFAULT_LOCALE.to_string()
            } else {
                locale.to_string()
            },
            ..DescriptionRowData::default()
        };
        self.descriptions.push(row.clone());
        row
    }

    /// Append an empty mapping row and return its id.
    pub fn add_mapping_row(&mut self) -> String {
        let row = MappingRowData::new();
        let id = row.id.clone();
        self.mappings.push(row);
        id
    }

    pub fn apply_description(&mut self, message: DescriptionMessage) {
        match message {
            DescriptionMessage::Snapshot(snapshot) => {
                match self.descriptions.iter_mut().find(|d| d.uuid == snapshot.uuid) {
                    Some(existing) => *existing = snapshot,
                    None => self.descriptions.push(snapshot),
                }
            }
            DescriptionMessage::RemoveRow(original) => {
                if self.persisted_descriptions.contains(&original.uuid)
                    && !self.removed_descriptions.iter().any(|d| d.uuid == original.uuid)
                {
                    self.removed_descriptions.push(original);
                }
            }
            DescriptionMessage::RemoveData { id, kind } => self.remove_data(&id, kind),
        }
    }

    pub fn apply_mapping(&mut self, message: MappingMessage) {
        match message {
            MappingMessage::Update {
                row_id,
                field,
                value,
            } => {
                let Some(row) = self.mappings.iter_mut().find(|m| m.id == row_id) else {
                    tracing::debug!(%row_id, "update for unknown mapping row");
                    return;
                };
                match field {
                    MappingField::Source => {
                        if row.source != value {
                            row.to_concept_url = None;
                        }
                        row.source = value;
                    }
                    MappingField::MapType => row.map_type = value,
                    MappingField::ToConceptCode => row.to_concept_code = value,
                    MappingField::ToConceptName => row.to_concept_name = value,
                }
            }
            MappingMessage::AsyncSelect { row_id, option } => {
                if let Some(row) = self.mappings.iter_mut().find(|m| m.id == row_id) {
                    match option {
                        Some(option) => {
                            row.to_concept_code = option.code;
                            row.to_concept_name = option.name;
                            row.to_concept_url = Some(option.value);
                        }
                        None => {
                            row.to_concept_code.clear();
                            row.to_concept_name.clear();
                            row.to_concept_url = None;
                        }
                    }
                }
            }
            MappingMessage::Remove { row_id } => {
                if let Some(url) = self
                    .mappings
                    .iter()
                    .find(|m| m.id == row_id)
                    .and_then(|m| m.url.clone())
                {
                    self.removed_mappings.push(url);
                }
                self.remove_data(&row_id, RowKind::Mappings);
            }
        }
    }

    /// Drop a row's data from the named collection.
    pub fn remove_data(&mut self, id: &str, kind: RowKind) {
        match kind {
            RowKind::Names => self.names.retain(|n| n.uuid != id),
            RowKind::Descriptions => self.descriptions.retain(|d| d.uuid != id),
            RowKind::Mappings => self.mappings.retain(|m| m.id != id),
        }
    }

    /// Check the whole form, collecting every problem.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        if self.id.trim().is_empty() {
            issues.push("concept id is required".to_string());
        }
        if self.concept_class.is_none() {
            issues.push("concept class is required".to_string());
        }
        if self.datatype.is_none() {
            issues.push("datatype is required".to_string());
        }
        if self.names.iter().all(|n| n.name.trim().is_empty()) {
            issues.push("at least one name is required".to_string());
        }
        for d in &self.descriptions {
            if d.description.trim().is_empty() {
                issues.push(format!("description {}: text is required", d.uuid));
            }
        }
        for m in &self.mappings {
            issues.extend(m.issues());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(issues))
        }
    }

    /// Concept document for create and update requests. Row ids are not sent.
    pub fn to_concept_body(&self) -> Value {
        let names: Vec<Value> = self
            .names
            .iter()
            .filter(|n| !n.name.trim().is_empty())
            .map(|n| {
                json!({
                    "name": n.name,
                    "locale": n.locale,
                    "locale_preferred": n.locale_preferred,
                    "name_type": n.name_type,
                })
            })
            .collect();
        let descriptions: Vec<Value> = self
            .descriptions
            .iter()
            .map(|d| json!({ "locale": d.locale, "description": d.description }))
            .collect();

        json!({
            "id": self.id,
            "concept_class": self.concept_class.map(|c| c.as_str()),
            "datatype": self.datatype.map(|d| d.as_str()),
            "names": names,
            "descriptions": descriptions,
        })
    }

    /// Mapping documents for the rows not yet on the service.
    pub fn new_mapping_bodies(&self, from_concept_url: &str) -> Vec<Value> {
        self.new_mappings(from_concept_url)
            .into_iter()
            .map(|(_, body)| body)
            .collect()
    }

    /// Like [`new_mapping_bodies`](Self::new_mapping_bodies), paired with
    /// each body's row id.
    pub fn new_mappings(&self, from_concept_url: &str) -> Vec<(String, Value)> {
        self.mappings
            .iter()
            .filter(|m| m.url.is_none() && !self.saved_mapping_rows.contains(&m.id))
            .map(|m| (m.id.clone(), mapping_body(m, from_concept_url)))
            .collect()
    }

    // Save bookkeeping. A save that fails partway leaves only the remaining
    // work queued, so saving again picks up where it stopped.

    pub fn mark_created(&mut self, concept_url: impl Into<String>) {
        self.concept_url = Some(concept_url.into());
    }

    pub fn mark_description_deleted(&mut self, uuid: &str) {
        self.removed_descriptions.retain(|d| d.uuid != uuid);
        self.persisted_descriptions.remove(uuid);
    }

    pub fn mark_mapping_deleted(&mut self, mapping_url: &str) {
        self.removed_mappings.retain(|url| url != mapping_url);
    }

    /// Record that a new mapping row now exists on the service.
    pub fn mark_mapping_saved(&mut self, row_id: &str, mapping_url: Option<String>) {
        match (self.mappings.iter_mut().find(|m| m.id == row_id), mapping_url) {
            (Some(row), Some(url)) => row.url = Some(url),
            _ => {
                self.saved_mapping_rows.insert(row_id.to_string());
            }
        }
    }
}

fn mapping_body(row: &MappingRowData, from_concept_url: &str) -> Value {
    if is_internal_source(&row.source) {
        return json!({
            "map_type": row.map_type,
            "from_concept_url": from_concept_url,
            "to_concept_url": row.to_concept_url,
        });
    }
    let mut body = json!({
        "map_type": row.map_type,
        "from_concept_url": from_concept_url,
        "to_source_url": source_url(&row.source),
        "to_concept_code": row.to_concept_code,
    });
    if !row.to_concept_name.trim().is_empty() {
        body["to_concept_name"] = Value::String(row.to_concept_name.clone());
    }
    body
}

/// Sources are typed by name; the service addresses them by URL. A bare name
/// is taken to be an organization-owned source of the same name.
fn source_url(source: &str) -> String {
    if source.starts_with('/') {
        source.to_string()
    } else {
        format!("/orgs/{0}/sources/{0}/", source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SelectOption;

    fn filled_form() -> ConceptForm {
        let mut form = ConceptForm::new("malaria-1");
        form.concept_class = Some(ConceptClass::Diagnosis);
        form.datatype = Some(DataType::NotApplicable);
        form.add_name(NameRowData::new("Malaria", "en"));
        form
    }

    #[test]
    fn snapshots_upsert_by_row_id() {
        let mut form = filled_form();
        let row = form.add_description_row("fr");
        form.apply_description(DescriptionMessage::Snapshot(DescriptionRowData {
            description: "Paludisme".into(),
            ..row.clone()
        }));
        assert_eq!(form.descriptions().len(), 1);
        assert_eq!(form.descriptions()[0].description, "Paludisme");
    }

    #[test]
    fn removing_new_description_drops_data_only() {
        let mut form = filled_form();
        let row = form.add_description_row("en");
        form.apply_description(DescriptionMessage::RemoveRow(row.clone()));
        form.apply_description(DescriptionMessage::RemoveData {
            id: row.uuid.clone(),
            kind: RowKind::Descriptions,
        });
        assert!(form.descriptions().is_empty());
        assert!(form.removed_descriptions().is_empty());
    }

    #[test]
    fn async_select_fills_reference() {
        let mut form = filled_form();
        let id = form.add_mapping_row();
        form.apply_mapping(MappingMessage::Update {
            row_id: id.clone(),
            field: MappingField::Source,
            value: "CIEL".into(),
        });
        form.apply_mapping(MappingMessage::Update {
            row_id: id.clone(),
            field: MappingField::MapType,
            value: "SAME-AS".into(),
        });
        form.apply_mapping(MappingMessage::AsyncSelect {
            row_id: id.clone(),
            option: Some(SelectOption {
                value: "/orgs/CIEL/sources/CIEL/concepts/116128/".into(),
                label: "Malaria - 116128".into(),
                code: "116128".into(),
                name: "Malaria".into(),
            }),
        });
        assert!(form.validate().is_ok());

        let bodies = form.new_mapping_bodies("/orgs/Me/sources/Mine/concepts/malaria-1/");
        assert_eq!(
            bodies,
            vec![json!({
                "map_type": "SAME-AS",
                "from_concept_url": "/orgs/Me/sources/Mine/concepts/malaria-1/",
                "to_concept_url": "/orgs/CIEL/sources/CIEL/concepts/116128/",
            })]
        );

        form.apply_mapping(MappingMessage::Update {
            row_id: id,
            field: MappingField::Source,
            value: "ICD-10".into(),
        });
        assert!(form.mappings()[0].to_concept_url.is_none());
    }

    #[test]
    fn external_mapping_body() {
        let mut form = filled_form();
        let id = form.add_mapping_row();
        for (field, value) in [
            (MappingField::Source, "ICD-10"),
            (MappingField::MapType, "SAME-AS"),
            (MappingField::ToConceptCode, "B54"),
        ] {
            form.apply_mapping(MappingMessage::Update {
                row_id: id.clone(),
                field,
                value: value.into(),
            });
        }
        let bodies = form.new_mapping_bodies("/c/");
        assert_eq!(bodies[0]["to_source_url"], "/orgs/ICD-10/sources/ICD-10/");
        assert_eq!(bodies[0]["to_concept_code"], "B54");
        assert!(bodies[0].get("to_concept_name").is_none());
    }

    #[test]
    fn saved_work_leaves_the_queues() {
        let mut form = filled_form();
        form.persisted_descriptions.insert("d-1".into());
        form.apply_description(DescriptionMessage::RemoveRow(DescriptionRowData {
            uuid: "d-1".into(),
            locale: "en".into(),
            description: "Old".into(),
        }));
        form.removed_mappings.push("/m/7/".into());
        let first = form.add_mapping_row();
        let second = form.add_mapping_row();

        form.mark_description_deleted("d-1");
        form.mark_mapping_deleted("/m/7/");
        form.mark_mapping_saved(&first, Some("/m/8/".into()));
        form.mark_mapping_saved(&second, None);

        assert!(form.removed_descriptions().is_empty());
        assert!(form.removed_mappings().is_empty());
        assert!(form.new_mappings("/c/").is_empty());
        assert_eq!(form.mappings()[0].url.as_deref(), Some("/m/8/"));
        assert!(form.concept_url().is_none());
        form.mark_created("/c/");
        assert_eq!(form.concept_url(), Some("/c/"));
    }

    #[test]
    fn validation_collects_every_issue() {
        let mut form = ConceptForm::new("");
        form.add_description_row("en");
        form.add_mapping_row();
        let err = form.validate().unwrap_err();
        assert_eq!(err.issues().len(), 6);
        assert!(err.to_string().contains("concept class is required"));
    }

    #[test]
    fn body_omits_row_ids() {
        let mut form = filled_form();
        let row = form.add_description_row("en");
        form.apply_description(DescriptionMessage::Snapshot(DescriptionRowData {
            description: "A parasitic disease".into(),
            ..row
        }));
        let body = form.to_concept_body();
        assert_eq!(body["concept_class"], "Diagnosis");
        assert_eq!(body["datatype"], "N/A");
        assert_eq!(
            body["descriptions"],
            json!([{"locale": "en", "description": "A parasitic disease"}])
        );
        assert!(body["names"][0].get("uuid").is_none());
    }
}
