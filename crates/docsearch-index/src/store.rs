//! Index store client.
//!
//! The search engine itself is an external service; this module defines
//! the narrow "persist document to index" contract the sync layer
//! consumes, plus an HTTP implementation of it. Connectivity and
//! rejection failures propagate to the caller without retries at this
//! layer, and a document either fully indexes or its sync step fails.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, warn};

use docsearch_types::Settings;

use thiserror::Error;

/// Errors from index store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection, TLS, malformed response)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store rejected the request
    #[error("Store rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// IO error reading local TLS material
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error while building a request
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Contract for persisting documents to the search index.
///
/// Deletes are idempotent: removing an absent document or index is not
/// an error.
pub trait IndexStore: Send + Sync {
    /// Create the index with the given body if it does not exist.
    fn ensure_index(&self, name: &str, body: &Value) -> Result<(), StoreError>;

    /// Drop the index. Missing index is not an error.
    fn delete_index(&self, name: &str) -> Result<(), StoreError>;

    /// Store one document under the given id, replacing any existing one.
    fn put_document(&self, index: &str, doc_id: &str, source: &Value) -> Result<(), StoreError>;

    /// Remove one document. Missing document is not an error.
    fn delete_document(&self, index: &str, doc_id: &str) -> Result<(), StoreError>;

    /// Store many documents in one request. Returns how many the store
    /// accepted; rejected items are logged.
    fn bulk_put(&self, index: &str, docs: &[(String, Value)]) -> Result<usize, StoreError>;

    /// Make pending changes visible to search.
    fn refresh(&self, index: &str) -> Result<(), StoreError>;
}

/// HTTP index store speaking the Elasticsearch REST API.
#[derive(Debug)]
pub struct ElasticStore {
    client: Client,
    base_url: String,
    user: String,
    password: SecretString,
}

impl ElasticStore {
    /// Build a store client from connection settings.
    ///
    /// Applies the configured CA bundle when present. The fingerprint pin
    /// is accepted in settings but not yet enforced here.
    pub fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let mut builder = Client::builder();

        if let Some(path) = &settings.ca_certs {
            let pem = std::fs::read(path)?;
            let cert = reqwest::Certificate::from_pem(&pem)?;
            builder = builder.add_root_certificate(cert);
        }

        if settings.cert_fingerprint.is_some() {
            // TODO: enforce the pin once reqwest exposes the peer
            // certificate chain; until then only the CA bundle is checked.
            warn!("cert_fingerprint is configured but not enforced");
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: settings.host.trim_end_matches('/').to_string(),
            user: settings.user.clone(),
            password: settings.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.user, Some(self.password.expose_secret()))
    }

    /// Map non-success statuses to a rejection error.
    fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let reason = response.text().unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            reason,
        })
    }
}

/// Build the newline-delimited body for a bulk index request.
fn bulk_body(index: &str, docs: &[(String, Value)]) -> Result<String, serde_json::Error> {
    let mut body = String::new();
    for (doc_id, source) in docs {
        let action = serde_json::json!({
            "index": { "_index": index, "_id": doc_id }
        });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(source)?);
        body.push('\n');
    }
    Ok(body)
}

impl IndexStore for ElasticStore {
    fn ensure_index(&self, name: &str, body: &Value) -> Result<(), StoreError> {
        let head = self.auth(self.client.head(self.url(name))).send()?;
        if head.status().is_success() {
            debug!(index = name, "Index already exists");
            return Ok(());
        }
        if head.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Rejected {
                status: head.status().as_u16(),
                reason: "unexpected status probing index".to_string(),
            });
        }

        let response = self
            .auth(self.client.put(self.url(name)))
            .json(body)
            .send()?;
        Self::check(response)?;
        info!(index = name, "Created index");
        Ok(())
    }

    fn delete_index(&self, name: &str) -> Result<(), StoreError> {
        let response = self.auth(self.client.delete(self.url(name))).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(index = name, "Index already absent");
            return Ok(());
        }
        Self::check(response)?;
        info!(index = name, "Deleted index");
        Ok(())
    }

    fn put_document(&self, index: &str, doc_id: &str, source: &Value) -> Result<(), StoreError> {
        let path = format!("{}/_doc/{}", index, doc_id);
        let response = self
            .auth(self.client.put(self.url(&path)))
            .json(source)
            .send()?;
        Self::check(response)?;
        debug!(index, doc_id, "Stored document");
        Ok(())
    }

    fn delete_document(&self, index: &str, doc_id: &str) -> Result<(), StoreError> {
        let path = format!("{}/_doc/{}", index, doc_id);
        let response = self.auth(self.client.delete(self.url(&path))).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(index, doc_id, "Document already absent");
            return Ok(());
        }
        Self::check(response)?;
        debug!(index, doc_id, "Deleted document");
        Ok(())
    }

    fn bulk_put(&self, index: &str, docs: &[(String, Value)]) -> Result<usize, StoreError> {
        if docs.is_empty() {
            return Ok(0);
        }

        let body = bulk_body(index, docs)?;
        let response = self
            .auth(self.client.post(self.url("_bulk")))
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()?;
        let response = Self::check(response)?;

        let value: Value = response.json()?;
        let mut accepted = docs.len();
        if value.get("errors").and_then(Value::as_bool).unwrap_or(false) {
            if let Some(items) = value.get("items").and_then(Value::as_array) {
                for item in items {
                    if let Some(error) = item.get("index").and_then(|i| i.get("error")) {
                        warn!(index, error = %error, "Bulk item rejected");
                        accepted = accepted.saturating_sub(1);
                    }
                }
            }
        }

        debug!(index, total = docs.len(), accepted, "Bulk stored documents");
        Ok(accepted)
    }

    fn refresh(&self, index: &str) -> Result<(), StoreError> {
        let path = format!("{}/_refresh", index);
        let response = self.auth(self.client.post(self.url(&path))).send()?;
        Self::check(response)?;
        debug!(index, "Refreshed index");
        Ok(())
    }
}
