//! OCL terminology service API client

use crate::api::TerminologyApi;
use crate::error::{Error, ErrorMessage, Result};
use crate::models::{into_list, references_path, ConceptQuery};
use async_trait::async_trait;
use ocldm_models::references_body;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const OCL_BASE_URL: &str = "https://api.openconceptlab.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`OclClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// API token sent as `Authorization: Token <token>`.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: OCL_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Client for an OCL terminology service.
#[derive(Debug, Clone)]
pub struct OclClient {
    client: Client,
    base_url: String,
    base: Url,
    token: Option<String>,
}

impl OclClient {
    /// Create a client for the public OCL API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(ClientOptions {
            base_url: base_url.into(),
            ..ClientOptions::default()
        })
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let base = Url::parse(&options.base_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL cannot carry paths: {}",
                options.base_url
            )));
        }
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            base,
            token: options.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path-style resource address against the base URL. Absolute
    /// URLs are passed through.
    pub fn url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Whether `url` is served by the configured service.
    pub fn is_own_origin(&self, url: &Url) -> bool {
        url.origin() == self.base.origin()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "terminology request");
        // The token only goes to the configured service.
        let token = self.token.as_ref().filter(|_| self.is_own_origin(&url));
        let mut builder = self.client.request(method, url);
        if let Some(token) = token {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }
        Ok(builder)
    }

    /// Send a request and decode the JSON body. Empty bodies decode to `null`.
    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (message, data) = ErrorMessage::from_text(&text);
            tracing::debug!(status = status.as_u16(), ?message, "terminology request failed");
            return Err(Error::Status {
                status: status.as_u16(),
                message,
                data,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let builder = self.request(Method::GET, path)?.query(params);
        self.send(builder).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.send(builder).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl TerminologyApi for OclClient {
    async fn search_concepts(&self, query: &ConceptQuery) -> Result<Vec<Value>> {
        let value = self.get_json(&query.path(), &query.params()).await?;
        Ok(into_list(value))
    }

    async fn fetch_concept_sources(&self) -> Result<Vec<Value>> {
        let params = [("limit", "0".to_string()), ("verbose", "true".to_string())];
        let value = self.get_json("/sources/", &params).await?;
        Ok(into_list(value))
    }

    async fn search_source_concepts(
        &self,
        source_url: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Value>> {
        let path = format!("{}/concepts/", source_url.trim_end_matches('/'));
        let mut params = vec![("limit", limit.to_string()), ("verbose", "true".to_string())];
        if !query.is_empty() {
            params.insert(0, ("q", query.to_string()));
        }
        let value = self.get_json(&path, &params).await?;
        Ok(into_list(value))
    }

    async fn fetch_concept(&self, concept_url: &str) -> Result<Value> {
        let params = [
            ("includeMappings", "true".to_string()),
            ("verbose", "true".to_string()),
        ];
        self.get_json(concept_url, &params).await
    }

    async fn add_references(&self, collection_url: &str, expressions: &[String]) -> Result<Value> {
        let body = references_body(expressions.iter().cloned());
        self.post_json(collection_url, &body).await
    }

    async fn add_dictionary_references(
        &self,
        owner_url: &str,
        dictionary_id: &str,
        expressions: &[String],
    ) -> Result<Value> {
        let path = references_path(owner_url, dictionary_id);
        self.add_references(&path, expressions).await
    }

    async fn create_concept(&self, source_url: &str, body: &Value) -> Result<Value> {
        let path = format!("{}/concepts/", source_url.trim_end_matches('/'));
        self.post_json(&path, body).await
    }

    async fn update_concept(&self, concept_url: &str, body: &Value) -> Result<Value> {
        self.put_json(concept_url, body).await
    }

    async fn create_mapping(&self, source_url: &str, body: &Value) -> Result<Value> {
        let path = format!("{}/mappings/", source_url.trim_end_matches('/'));
        self.post_json(&path, body).await
    }

    async fn delete_description(&self, concept_url: &str, uuid: &str) -> Result<()> {
        let path = format!(
            "{}/descriptions/{}/",
            concept_url.trim_end_matches('/'),
            urlencoding::encode(uuid)
        );
        self.delete(&path).await
    }

    async fn delete_mapping(&self, mapping_url: &str) -> Result<()> {
        self.delete(mapping_url).await
    }
}
