//! Blocking HTTP client for the Sphere API.
//!
//! Every request carries the API key as a bearer token; when a compute
//! cluster is configured it is routed via the `X-Featrix-Cluster` header.
//! There is no retry logic: a failed request surfaces immediately.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{Result, SphereError};
use crate::model::FoundationalModel;
use crate::types::{CreatedModel, HealthReport, ModelRecord};

/// Default API server.
pub const DEFAULT_BASE_URL: &str = "https://sphere-api.featrix.com";

/// Header naming the compute cluster a request should be routed to.
pub const CLUSTER_HEADER: &str = "x-featrix-cluster";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Blocking Sphere API client.
pub struct SphereClient {
    http: Client,
    base_url: String,
    api_key: String,
    compute_cluster: Option<String>,
}

impl std::fmt::Debug for SphereClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SphereClient")
            .field("base_url", &self.base_url)
            .field("compute_cluster", &self.compute_cluster)
            .finish_non_exhaustive()
    }
}

/// Parameters for creating a foundational model.
#[derive(Debug, Clone)]
pub struct CreateModelRequest<'a> {
    /// Model name.
    pub name: &'a str,
    /// Training data file (CSV, Parquet, or JSON).
    pub data_file: &'a Path,
    /// Training epochs; the server picks automatically when `None`.
    pub epochs: Option<u32>,
    /// Columns excluded from the embedding space.
    pub ignore_columns: &'a [String],
    /// Prefix for the server-side session name.
    pub session_name_prefix: Option<&'a str>,
}

/// Parameters for extending a model with new data.
#[derive(Debug, Clone)]
pub struct ExtendModelRequest<'a> {
    /// New training data file.
    pub new_data_file: &'a Path,
    /// Additional training epochs; the server picks automatically when `None`.
    pub epochs: Option<u32>,
}

impl SphereClient {
    /// Create a client for the given server.
    ///
    /// The URL must be `http://` or `https://`; a trailing slash is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has the wrong scheme or the underlying
    /// HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SphereError::InvalidBaseUrl { url: base_url });
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        debug!(base_url = %base_url, "sphere client ready");
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            compute_cluster: None,
        })
    }

    /// Route requests through the named compute cluster.
    #[must_use]
    pub fn with_cluster(mut self, cluster: Option<String>) -> Self {
        self.compute_cluster = cluster;
        self
    }

    /// The server URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured compute cluster, if any.
    #[must_use]
    pub fn compute_cluster(&self) -> Option<&str> {
        self.compute_cluster.as_deref()
    }

    /// Check API server health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn health_check(&self) -> Result<HealthReport> {
        self.get_json("health_check", "/health")
    }

    /// Create a new foundational model from a data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file is missing or the upload fails.
    pub fn create_foundational_model(
        &self,
        request: &CreateModelRequest<'_>,
    ) -> Result<CreatedModel> {
        let metadata = serde_json::json!({
            "name": request.name,
            "epochs": request.epochs,
            "ignore_columns": request.ignore_columns,
            "session_name_prefix": request.session_name_prefix,
        });
        let form = upload_form(&metadata, request.data_file)?;
        let req = self
            .http
            .post(self.url("/api/v1/models"))
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT);
        self.execute("create_foundational_model", req)
    }

    /// List model identifiers, optionally filtered by a name prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn list_models(&self, name_prefix: &str) -> Result<Vec<String>> {
        let mut req = self.http.get(self.url("/api/v1/models"));
        if !name_prefix.is_empty() {
            req = req.query(&[("prefix", name_prefix)]);
        }
        let listing: ModelListing = self.execute("list_models", req)?;
        Ok(listing.models)
    }

    /// Fetch a model and return a handle for per-model operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the model does not exist or the request fails.
    pub fn foundational_model(&self, model_id: &str) -> Result<FoundationalModel<'_>> {
        let record: ModelRecord =
            self.get_json("foundational_model", &format!("/api/v1/models/{model_id}"))?;
        Ok(FoundationalModel::new(self, record))
    }

    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T> {
        self.execute(operation, self.http.get(self.url(path)))
    }

    pub(crate) fn post_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.execute(operation, self.http.post(self.url(path)).json(body))
    }

    pub(crate) fn post_multipart<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        metadata: &serde_json::Value,
        data_file: &Path,
    ) -> Result<T> {
        let form = upload_form(metadata, data_file)?;
        let req = self
            .http
            .post(self.url(path))
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT);
        self.execute(operation, req)
    }

    pub(crate) fn delete_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T> {
        self.execute(operation, self.http.delete(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.bearer_auth(&self.api_key);
        match &self.compute_cluster {
            Some(cluster) => req.header(CLUSTER_HEADER, cluster),
            None => req,
        }
    }

    fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        req: RequestBuilder,
    ) -> Result<T> {
        trace!(operation, "sending request");
        let response = self.authorize(req).send()?;
        let status = response.status();
        trace!(operation, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(SphereError::Api {
                operation,
                status: status.as_u16(),
                message: error_message(response),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| SphereError::Decode {
            operation,
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct ModelListing {
    #[serde(default)]
    models: Vec<String>,
}

fn upload_form(metadata: &serde_json::Value, data_file: &Path) -> Result<multipart::Form> {
    if !data_file.is_file() {
        return Err(SphereError::DataFileNotFound {
            path: data_file.to_path_buf(),
        });
    }
    let form = multipart::Form::new()
        .text("metadata", metadata.to_string())
        .file("data", data_file)?;
    Ok(form)
}

/// Pull a message out of an error response body.
///
/// Tries the conventional `error`/`detail`/`message` JSON keys before
/// falling back to the raw body.
fn error_message(response: Response) -> String {
    let text = response.text().unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
                return message.to_string();
            }
        }
    }
    if text.is_empty() {
        "(no response body)".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_url() {
        let result = SphereClient::new("ws://sphere.example.com", "key");
        let err = result.expect_err("should reject");
        assert!(matches!(err, SphereError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_bare_hostname() {
        let result = SphereClient::new("sphere.example.com", "key");
        assert!(result.is_err());
    }

    #[test]
    fn trims_trailing_slash() {
        let client =
            SphereClient::new("https://sphere.example.com/", "key").expect("client builds");
        assert_eq!(client.base_url(), "https://sphere.example.com");
        assert_eq!(client.url("/health"), "https://sphere.example.com/health");
    }

    #[test]
    fn cluster_defaults_to_none() {
        let client =
            SphereClient::new("https://sphere.example.com", "key").expect("client builds");
        assert_eq!(client.compute_cluster(), None);

        let client = client.with_cluster(Some("gpu-west".into()));
        assert_eq!(client.compute_cluster(), Some("gpu-west"));
    }

    #[test]
    fn upload_form_requires_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.csv");
        let err = upload_form(&serde_json::json!({}), &missing).expect_err("should fail");
        assert!(matches!(err, SphereError::DataFileNotFound { .. }));
    }

    #[test]
    fn upload_form_accepts_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").expect("write");
        assert!(upload_form(&serde_json::json!({"name": "m"}), &path).is_ok());
    }

    #[test]
    fn model_listing_tolerates_missing_field() {
        let listing: ModelListing = serde_json::from_str("{}").expect("deserialize");
        assert!(listing.models.is_empty());
    }
}
