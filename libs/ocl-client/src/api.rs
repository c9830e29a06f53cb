//! The terminology service seam
//!
//! Workflows depend on this trait rather than on [`crate::OclClient`], so any
//! transport (HTTP, recorded fixtures, in-memory fakes) can drive them.

use crate::error::Result;
use crate::models::ConceptQuery;
use async_trait::async_trait;
use serde_json::Value;

/// Operations a dictionary manager needs from a terminology service.
///
/// Bodies are opaque JSON: their shape is owned by the remote service.
#[async_trait]
pub trait TerminologyApi: Send + Sync {
    /// Search concepts, globally or within one owner.
    async fn search_concepts(&self, query: &ConceptQuery) -> Result<Vec<Value>>;

    /// List the sources concepts can be imported from.
    async fn fetch_concept_sources(&self) -> Result<Vec<Value>>;

    /// Search the concepts of one source, e.g. the public CIEL source.
    async fn search_source_concepts(
        &self,
        source_url: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Value>>;

    /// Fetch one concept with its mappings.
    async fn fetch_concept(&self, concept_url: &str) -> Result<Value>;

    /// Add reference expressions to the collection at `collection_url`.
    async fn add_references(&self, collection_url: &str, expressions: &[String]) -> Result<Value>;

    /// Add reference expressions to `<owner_url>collections/<dictionary_id>/`.
    async fn add_dictionary_references(
        &self,
        owner_url: &str,
        dictionary_id: &str,
        expressions: &[String],
    ) -> Result<Value>;

    async fn create_concept(&self, source_url: &str, body: &Value) -> Result<Value>;

    async fn update_concept(&self, concept_url: &str, body: &Value) -> Result<Value>;

    async fn create_mapping(&self, source_url: &str, body: &Value) -> Result<Value>;

    async fn delete_description(&self, concept_url: &str, uuid: &str) -> Result<()>;

    async fn delete_mapping(&self, mapping_url: &str) -> Result<()>;
}
