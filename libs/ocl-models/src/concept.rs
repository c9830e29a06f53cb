//! Concept, description and mapping models
//!
//! The terminology service owns the shape of these documents, so every
//! struct keeps unknown fields in `extensions` and round-trips them.

use crate::classification::{ConceptClass, DataType};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// A terminology entry identified by its path-style URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Path-style URL, e.g. `/orgs/CIEL/sources/CIEL/concepts/1234/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Kept as a string: remote sources use classes outside our dropdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default)]
    pub retired: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<ConceptName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<Description>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<Mapping>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Concept {
    /// Parse a concept from an opaque service response.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn concept_class(&self) -> Option<ConceptClass> {
        self.concept_class.as_deref().and_then(|c| c.parse().ok())
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.datatype.as_deref().and_then(|d| d.parse().ok())
    }

    /// Concept URL, or an error naming the concept id.
    pub fn require_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| Error::MissingField(format!("url of concept {:?}", self.id)))
    }
}

/// A localized name of a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptName {
    pub name: String,

    pub locale: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_preferred: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Localized free-text description of a concept.
///
/// `uuid` identifies the edit row only; the service assigns its own identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default = "new_row_id")]
    pub uuid: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Description {
    pub fn new(locale: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: new_row_id(),
            locale: locale.into(),
            description: description.into(),
            extensions: HashMap::new(),
        }
    }
}

/// Relation from a concept to a code in another source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub map_type: String,

    /// Source identifier (`CIEL`, `ICD-10`, ...) or source URL.
    #[serde(default)]
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_concept_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_concept_name: Option<String>,

    /// Resolved reference, set for mappings into the internal default source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_concept_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Owner kind in path-style URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    #[serde(rename = "Organization")]
    Organization,
    #[serde(rename = "User")]
    User,
}

impl OwnerType {
    /// Path segment used for this owner kind (`orgs` / `users`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            OwnerType::Organization => "orgs",
            OwnerType::User => "users",
        }
    }
}

impl std::str::FromStr for OwnerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Organization" | "organization" | "orgs" => Ok(OwnerType::Organization),
            "User" | "user" | "users" => Ok(OwnerType::User),
            other => Err(Error::UnknownMember {
                kind: "owner type",
                value: other.to_string(),
            }),
        }
    }
}

/// Components of a concept URL such as `/orgs/WHO/sources/ICD-10/concepts/A15.2/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptPath {
    pub owner_type: OwnerType,
    pub owner: String,
    pub source: String,
    pub concept_id: String,
}

impl ConceptPath {
    pub fn parse(url: &str) -> Result<Self> {
        let segments: Vec<&str> = url.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [owner_kind, owner, "sources", source, "concepts", concept_id, ..] => {
                let owner_type = owner_kind
                    .parse()
                    .map_err(|_| Error::InvalidUrl(url.to_string()))?;
                Ok(Self {
                    owner_type,
                    owner: owner.to_string(),
                    source: source.to_string(),
                    concept_id: concept_id.to_string(),
                })
            }
            _ => Err(Error::InvalidUrl(url.to_string())),
        }
    }

    pub fn owner_url(&self) -> String {
        format!("/{}/{}/", self.owner_type.path_segment(), self.owner)
    }

    pub fn source_url(&self) -> String {
        format!("{}sources/{}/", self.owner_url(), self.source)
    }
}

/// Body of a reference-creation request: `{"data": {"expressions": [...]}}`.
pub fn references_body<I, S>(expressions: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let expressions: Vec<String> = expressions.into_iter().map(Into::into).collect();
    json!({ "data": { "expressions": expressions } })
}

/// Read the expression list back out of a reference-creation body.
pub fn expressions_of(body: &Value) -> Vec<String> {
    body.pointer("/data/expressions")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Fresh client-side row id.
pub fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_locale() -> String {
    "en".to_string()
}
