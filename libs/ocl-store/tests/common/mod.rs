//! Scripted terminology service shared by the workflow tests.

use async_trait::async_trait;
use ocldm_client::{ConceptQuery, Error, ErrorMessage, Result, TerminologyApi};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedService {
    /// Concept documents by URL; unknown URLs fail with 404.
    pub concepts: HashMap<String, Value>,
    pub search_error: Option<fn() -> Error>,
    pub sources_error: Option<fn() -> Error>,
    pub references_error: Option<fn() -> Error>,
    pub delete_error: Option<fn() -> Error>,
    /// Overrides `delete_error` for mapping deletes.
    pub mapping_delete_error: Option<fn() -> Error>,
    pub mapping_error: Option<fn() -> Error>,
    pub in_flight: AtomicUsize,
    /// Most concept lookups seen running at once.
    pub peak_lookups: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedService {
    pub fn with_concepts(concepts: impl IntoIterator<Item = Value>) -> Self {
        let concepts = concepts
            .into_iter()
            .map(|c| (c["url"].as_str().unwrap().to_string(), c))
            .collect();
        Self {
            concepts,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<(String, Vec<String>)> {
        self.submitted.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn not_found() -> Error {
    Error::Status {
        status: 404,
        message: ErrorMessage::DetailMessage("Not found.".into()),
        data: Some(json!({"detail": "Not found."})),
    }
}

pub fn plain_failure() -> Error {
    Error::Transport {
        message: ErrorMessage::PlainMessage("Network unreachable".into()),
        reason: "dns error".into(),
        data: Some(json!("Network unreachable")),
    }
}

pub fn server_error() -> Error {
    Error::Status {
        status: 500,
        message: ErrorMessage::Unknown,
        data: None,
    }
}

/// Concept whose mappings are `(map_type, to_concept_url)` pairs.
pub fn concept(url: &str, mappings: &[(&str, &str)]) -> Value {
    let mappings: Vec<Value> = mappings
        .iter()
        .map(|(map_type, to)| json!({"map_type": map_type, "source": "CIEL", "to_concept_url": to}))
        .collect();
    json!({ "url": url, "id": url.trim_end_matches('/').rsplit('/').next(), "mappings": mappings })
}

#[async_trait]
impl TerminologyApi for ScriptedService {
    async fn search_concepts(&self, query: &ConceptQuery) -> Result<Vec<Value>> {
        self.record(format!("search {}", query.query));
        match self.search_error {
            Some(error) => Err(error()),
            None => Ok(vec![json!({"id": "1066"})]),
        }
    }

    async fn fetch_concept_sources(&self) -> Result<Vec<Value>> {
        self.record("sources".into());
        match self.sources_error {
            Some(error) => Err(error()),
            None => Ok(vec![json!({"id": "CIEL"}), json!({"id": "ICD-10"})]),
        }
    }

    async fn search_source_concepts(
        &self,
        source_url: &str,
        query: &str,
        _limit: u32,
    ) -> Result<Vec<Value>> {
        self.record(format!("source-search {} {}", source_url, query));
        match self.search_error {
            Some(error) => Err(error()),
            None => Ok(vec![json!({"id": "116128"})]),
        }
    }

    async fn fetch_concept(&self, concept_url: &str) -> Result<Value> {
        self.record(format!("fetch {}", concept_url));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_lookups.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.concepts.get(concept_url).cloned().ok_or_else(not_found)
    }

    async fn add_references(&self, collection_url: &str, expressions: &[String]) -> Result<Value> {
        self.record(format!("references {}", collection_url));
        if let Some(error) = self.references_error {
            return Err(error());
        }
        self.submitted
            .lock()
            .unwrap()
            .push((collection_url.to_string(), expressions.to_vec()));
        Ok(json!(expressions
            .iter()
            .map(|e| json!({"added": true, "expression": e}))
            .collect::<Vec<_>>()))
    }

    async fn add_dictionary_references(
        &self,
        owner_url: &str,
        dictionary_id: &str,
        expressions: &[String],
    ) -> Result<Value> {
        let url = ocldm_client::references_path(owner_url, dictionary_id);
        self.add_references(&url, expressions).await
    }

    async fn create_concept(&self, source_url: &str, body: &Value) -> Result<Value> {
        self.record(format!("create {}", source_url));
        let mut created = body.clone();
        created["url"] = json!(format!("{}concepts/{}/", source_url, body["id"].as_str().unwrap()));
        Ok(created)
    }

    async fn update_concept(&self, concept_url: &str, body: &Value) -> Result<Value> {
        self.record(format!("update {}", concept_url));
        let mut updated = body.clone();
        updated["url"] = json!(concept_url);
        Ok(updated)
    }

    async fn create_mapping(&self, source_url: &str, body: &Value) -> Result<Value> {
        self.record(format!("mapping {}", source_url));
        match self.mapping_error {
            Some(error) => Err(error()),
            None => Ok(body.clone()),
        }
    }

    async fn delete_description(&self, concept_url: &str, uuid: &str) -> Result<()> {
        self.record(format!("delete-description {} {}", concept_url, uuid));
        match self.delete_error {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }

    async fn delete_mapping(&self, mapping_url: &str) -> Result<()> {
        self.record(format!("delete-mapping {}", mapping_url));
        match self.mapping_delete_error.or(self.delete_error) {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}
