//! HTTP client for interacting with the HubSpot CRM API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles authentication, error mapping,
//! and cursor pagination for the object collection endpoints.

mod async_wrapper;
pub use async_wrapper::{AsyncHubSpotClient, AsyncHubSpotClientImpl};

use crate::config::Config;
use crate::error::{HubSpotApiError, HubSpotApiResult};
use crate::metrics::Metrics;
use crate::models::{AssociationPage, CrmObject, CrmObjectType, SearchRequest, SearchResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Page size used when walking a full object collection.
const COLLECTION_PAGE_SIZE: usize = 100;

/// One page of a CRM object collection.
#[derive(Debug, Deserialize)]
pub struct CollectionPage<T> {
    /// The records on this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Cursor for the next page, absent on the last page
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Paging metadata from the HubSpot API.
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<NextPage>,
}

/// Cursor of the following page.
#[derive(Debug, Deserialize)]
pub struct NextPage {
    pub after: String,
}

impl<T> CollectionPage<T> {
    fn next_cursor(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|n| n.after.as_str())
    }
}

/// HTTP client for the HubSpot CRM API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct HubSpotClient {
    /// Base URL for the HubSpot API
    base_url: String,

    /// Bearer token for authentication
    access_token: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl HubSpotClient {
    /// Create a new HubSpotClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.api_base_url.clone(),
            access_token: config.access_token.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a HubSpotClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, access_token: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            access_token,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a request with authentication and an optional JSON body.
    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ureq::Response, HubSpotApiError> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("{} {}", method, url);

        let request = self
            .agent
            .request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .set("Content-Type", "application/json");

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        }
        .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        match &result {
            Ok(response) => {
                tracing::debug!("{} {} - Success (status: {})", method, url, response.status());
            }
            Err(e) => {
                tracing::error!("{} {} - Error: {:?}", method, url, e);
                self.metrics.record_http_error();
            }
        }
        self.metrics.record_http_request(duration);

        result
    }

    /// Execute a GET request with authentication.
    fn get(&self, path: &str) -> Result<ureq::Response, HubSpotApiError> {
        self.send("GET", path, None)
    }

    /// Execute a POST request with authentication and JSON body.
    fn post(&self, path: &str, body: &Value) -> Result<ureq::Response, HubSpotApiError> {
        self.send("POST", path, Some(body))
    }

    /// Read a response body and deserialize it.
    fn read_json<T: DeserializeOwned>(response: ureq::Response) -> HubSpotApiResult<T> {
        let body = response
            .into_string()
            .map_err(|e| HubSpotApiError::HttpError(e.to_string()))?;
        serde_json::from_str(&body).map_err(HubSpotApiError::JsonError)
    }

    /// Map a ureq error to a HubSpotApiError.
    fn map_error(&self, error: ureq::Error) -> HubSpotApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => HubSpotApiError::Unauthorized,
                    404 => HubSpotApiError::NotFound(message),
                    429 => HubSpotApiError::RateLimitExceeded,
                    _ => HubSpotApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    HubSpotApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    HubSpotApiError::Timeout
                } else {
                    HubSpotApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= Object Operations =========================

    /// Fetch every record of a type, following `paging.next.after`.
    fn get_all_objects(&self, object_type: CrmObjectType) -> HubSpotApiResult<Vec<CrmObject>> {
        let mut all_objects = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut path = format!(
                "/crm/v3/objects/{}?limit={}&archived=false",
                object_type, COLLECTION_PAGE_SIZE
            );
            if let Some(cursor) = &after {
                path.push_str(&format!("&after={}", urlencoding::encode(cursor)));
            }

            let page: CollectionPage<CrmObject> = Self::read_json(self.get(&path)?)?;
            let next = page.next_cursor().map(str::to_string);
            all_objects.extend(page.results);

            match next {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        Ok(all_objects)
    }

    /// Get all contacts.
    pub fn get_all_contacts(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        let contacts = self.get_all_objects(CrmObjectType::Contacts)?;
        self.metrics.record_contacts_fetched(contacts.len());
        Ok(contacts)
    }

    /// Get all companies.
    pub fn get_all_companies(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        let companies = self.get_all_objects(CrmObjectType::Companies)?;
        self.metrics.record_companies_fetched(companies.len());
        Ok(companies)
    }

    /// Search records of a type with filter groups.
    pub fn search_objects(
        &self,
        object_type: CrmObjectType,
        request: &SearchRequest,
    ) -> HubSpotApiResult<SearchResponse> {
        let body = serde_json::to_value(request).map_err(HubSpotApiError::JsonError)?;
        let path = format!("/crm/v3/objects/{}/search", object_type);
        Self::read_json(self.post(&path, &body)?)
    }

    /// Create a record from a property mapping.
    pub fn create_object(
        &self,
        object_type: CrmObjectType,
        properties: &Map<String, Value>,
    ) -> HubSpotApiResult<CrmObject> {
        tracing::info!("Creating {} record", object_type);

        let body = serde_json::json!({ "properties": properties });
        let path = format!("/crm/v3/objects/{}", object_type);
        let created: CrmObject = Self::read_json(self.post(&path, &body)?)?;

        tracing::info!("{} record created with id: {}", object_type, created.id);
        Ok(created)
    }

    // ========================= Associations =========================

    /// Get a single page of links from one object to objects of another type.
    pub fn get_association_page(
        &self,
        object_type: CrmObjectType,
        object_id: &str,
        to_object_type: CrmObjectType,
        limit: usize,
    ) -> HubSpotApiResult<AssociationPage> {
        let path = format!(
            "/crm/v4/objects/{}/{}/associations/{}?limit={}",
            object_type,
            urlencoding::encode(object_id),
            to_object_type,
            limit
        );
        Self::read_json(self.get(&path)?)
    }

    // ========================= Raw Requests =========================

    /// Issue an arbitrary request and return the parsed JSON body.
    ///
    /// A body that is not valid JSON, including an empty one, is a `JsonError`.
    pub fn api_request(&self, method: &str, path: &str) -> HubSpotApiResult<Value> {
        let value: Value = Self::read_json(self.send(method, path, None)?)?;
        self.metrics.record_raw_request();
        Ok(value)
    }
}
