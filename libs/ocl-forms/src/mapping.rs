//! Mapping row
//!
//! One editable mapping entry. The row owns nothing but the text typed into
//! the concept search box; every other change is reported to the form as a
//! [`MappingMessage`].

use ocldm_client::{Result as ClientResult, TerminologyApi};
use ocldm_models::{is_internal_source, map_types_for, new_row_id, CIEL_SOURCE_URL};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of options offered by the concept search.
pub const SEARCH_OPTIONS_LIMIT: u32 = 20;

/// Canonical data of one mapping row, owned by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRowData {
    pub id: String,
    pub source: String,
    pub map_type: String,
    pub to_concept_code: String,
    pub to_concept_name: String,
    /// Set when a concept of the internal default source was selected.
    pub to_concept_url: Option<String>,
    /// Service URL of a mapping that already exists.
    pub url: Option<String>,
}

impl MappingRowData {
    pub fn new() -> Self {
        Self {
            id: new_row_id(),
            ..Self::default()
        }
    }

    /// Problems that block submission of this row.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.source.trim().is_empty() {
            issues.push(format!("mapping {}: source is required", self.id));
            return issues;
        }
        if self.map_type.trim().is_empty() {
            issues.push(format!("mapping {}: map type is required", self.id));
        }
        if is_internal_source(&self.source) {
            if self.to_concept_url.is_none() {
                issues.push(format!("mapping {}: select a {} concept", self.id, self.source));
            }
        } else if self.to_concept_code.trim().is_empty() {
            issues.push(format!("mapping {}: to_concept_code is required", self.id));
        }
        issues
    }
}

/// Input fields of the row, keyed by their input `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingField {
    Source,
    MapType,
    ToConceptCode,
    ToConceptName,
}

impl MappingField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "source" => Some(Self::Source),
            "map_type" => Some(Self::MapType),
            "to_concept_code" => Some(Self::ToConceptCode),
            "to_concept_name" => Some(Self::ToConceptName),
            _ => None,
        }
    }
}

/// A concept offered by the search control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Concept URL
    pub value: String,
    pub label: String,
    pub code: String,
    pub name: String,
}

impl SelectOption {
    pub fn from_concept(concept: &Value) -> Option<Self> {
        let url = concept.get("url")?.as_str()?;
        let code = concept.get("id").and_then(Value::as_str).unwrap_or_default();
        let name = concept
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or(code);
        Some(Self {
            value: url.to_string(),
            label: format!("{} - {}", name, code),
            code: code.to_string(),
            name: name.to_string(),
        })
    }
}

/// Events raised by the row's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEvent {
    FieldChanged { name: String, value: String },
    /// Keystroke in the search box.
    SearchInput(String),
    /// Choice in the search control; `None` when cleared.
    OptionSelected(Option<SelectOption>),
    Remove,
}

/// What the row reports to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingMessage {
    Update {
        row_id: String,
        field: MappingField,
        value: String,
    },
    AsyncSelect {
        row_id: String,
        option: Option<SelectOption>,
    },
    Remove {
        row_id: String,
    },
}

/// How the concept name is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptField {
    /// Searchable select over the internal default source.
    AsyncSearch { placeholder: &'static str },
    FreeText { placeholder: &'static str, value: String },
}

/// Fields the row shows for its current source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRowLayout {
    pub tab_index: usize,
    /// Free-text code input, required when shown.
    pub code_field: Option<String>,
    pub concept_field: Option<ConceptField>,
    pub map_types: Vec<&'static str>,
}

/// View of one mapping row plus its transient search text.
#[derive(Debug, Clone)]
pub struct MappingRow {
    data: MappingRowData,
    index: usize,
    input_value: String,
}

impl MappingRow {
    pub fn new(data: MappingRowData, index: usize) -> Self {
        Self {
            data,
            index,
            input_value: String::new(),
        }
    }

    pub fn data(&self) -> &MappingRowData {
        &self.data
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Refresh the row from the form's canonical data, keeping the search text.
    pub fn sync(&mut self, data: MappingRowData) {
        self.data = data;
    }

    pub fn layout(&self) -> MappingRowLayout {
        let source = self.data.source.as_str();
        let (code_field, concept_field) = if source.is_empty() {
            (None, None)
        } else if is_internal_source(source) {
            (
                None,
                Some(ConceptField::AsyncSearch {
                    placeholder: "concept name",
                }),
            )
        } else {
            (
                Some(self.data.to_concept_code.clone()),
                Some(ConceptField::FreeText {
                    placeholder: "concept name (optional)",
                    value: self.data.to_concept_name.clone(),
                }),
            )
        };

        MappingRowLayout {
            tab_index: self.index,
            code_field,
            concept_field,
            map_types: map_types_for(source),
        }
    }

    /// Handle an input event; `None` for events that stay inside the row.
    pub fn handle(&mut self, event: MappingEvent) -> Option<MappingMessage> {
        let row_id = self.data.id.clone();
        match event {
            MappingEvent::FieldChanged { name, value } => match MappingField::from_name(&name) {
                Some(field) => Some(MappingMessage::Update {
                    row_id,
                    field,
                    value,
                }),
                None => {
                    tracing::debug!(%name, "ignoring change of unknown mapping field");
                    None
                }
            },
            MappingEvent::SearchInput(text) => {
                self.input_value = text;
                None
            }
            MappingEvent::OptionSelected(option) => {
                Some(MappingMessage::AsyncSelect { row_id, option })
            }
            MappingEvent::Remove => Some(MappingMessage::Remove { row_id }),
        }
    }

    /// Options for the search control, from the current search text.
    pub async fn load_options(&self, api: &dyn TerminologyApi) -> ClientResult<Vec<SelectOption>> {
        tracing::debug!(index = self.index, query = %self.input_value, "loading mapping options");
        fetch_source_options(api, &self.data.source, &self.input_value).await
    }
}

/// Search the internal default source for concepts matching `query`.
///
/// Other sources take free text, so they get no options.
pub async fn fetch_source_options(
    api: &dyn TerminologyApi,
    source: &str,
    query: &str,
) -> ClientResult<Vec<SelectOption>> {
    if !is_internal_source(source) || query.trim().is_empty() {
        return Ok(Vec::new());
    }
    let concepts = api
        .search_source_concepts(CIEL_SOURCE_URL, query.trim(), SEARCH_OPTIONS_LIMIT)
        .await?;
    Ok(concepts.iter().filter_map(SelectOption::from_concept).collect())
}
