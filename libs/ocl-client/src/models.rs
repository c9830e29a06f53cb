//! Request models for the terminology service

use ocldm_models::OwnerType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size for concept searches.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Owner scope for a concept search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptOwner {
    pub name: String,
    pub owner_type: OwnerType,
}

/// Search parameters for concepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptQuery {
    pub query: String,
    pub limit: u32,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ConceptOwner>,
}

impl ConceptQuery {
    pub fn new(query: impl Into<String>, limit: u32, page: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            page,
            owner: None,
        }
    }

    /// Restrict the search to the concepts of one organization or user.
    pub fn owned_by(mut self, name: impl Into<String>, owner_type: OwnerType) -> Self {
        self.owner = Some(ConceptOwner {
            name: name.into(),
            owner_type,
        });
        self
    }

    /// Path of the search endpoint.
    pub fn path(&self) -> String {
        match &self.owner {
            Some(owner) => format!(
                "/{}/{}/concepts/",
                owner.owner_type.path_segment(),
                urlencoding::encode(&owner.name)
            ),
            None => "/concepts/".to_string(),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(("q", self.query.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params.push(("page", self.page.max(1).to_string()));
        params.push(("verbose", "true".to_string()));
        params
    }
}

impl Default for ConceptQuery {
    fn default() -> Self {
        Self::new("", DEFAULT_PAGE_SIZE, 1)
    }
}

/// Path of a collection's references endpoint.
pub fn references_path(owner_url: &str, dictionary_id: &str) -> String {
    format!(
        "{}/collections/{}/references/",
        owner_url.trim_end_matches('/'),
        urlencoding::encode(dictionary_id)
    )
}

/// Turn a list response into its items. The service answers searches with a
/// bare array; paginated deployments wrap it in `results`.
pub fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn global_search_path() {
        let q = ConceptQuery::new("malaria", 10, 1);
        assert_eq!(q.path(), "/concepts/");
        assert_eq!(
            q.params(),
            vec![
                ("q", "malaria".to_string()),
                ("limit", "10".to_string()),
                ("page", "1".to_string()),
                ("verbose", "true".to_string()),
            ]
        );
    }

    #[test]
    fn owner_scoped_search_path() {
        let q = ConceptQuery::new("malaria", 10, 1).owned_by("hadijah", OwnerType::Organization);
        assert_eq!(q.path(), "/orgs/hadijah/concepts/");
        let q = ConceptQuery::new("", 10, 0).owned_by("jane doe", OwnerType::User);
        assert_eq!(q.path(), "/users/jane%20doe/concepts/");
        assert_eq!(q.params()[0], ("limit", "10".to_string()));
        assert_eq!(q.params()[1], ("page", "1".to_string()));
    }

    #[test]
    fn builds_references_path() {
        assert_eq!(
            references_path("/orgs/WHO/", "ICD-10"),
            "/orgs/WHO/collections/ICD-10/references/"
        );
    }

    #[test]
    fn list_shapes() {
        assert_eq!(into_list(json!([1, 2])).len(), 2);
        assert_eq!(into_list(json!({"results": [1]})).len(), 1);
        assert!(into_list(json!({"count": 0})).is_empty());
        assert!(into_list(Value::Null).is_empty());
    }
}
