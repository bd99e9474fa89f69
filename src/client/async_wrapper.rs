//! Async wrapper around synchronous HubSpotClient.
//!
//! This module provides an async interface to the synchronous HubSpotClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::HubSpotClient;
use crate::error::{HubSpotApiError, HubSpotApiResult};
use crate::models::{AssociationPage, CrmObject, CrmObjectType, SearchRequest, SearchResponse};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The CRM capabilities the server depends on.
///
/// Everything above the HTTP layer talks to HubSpot through this trait, so
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait AsyncHubSpotClient: Send + Sync {
    async fn get_all_contacts(&self) -> HubSpotApiResult<Vec<CrmObject>>;
    async fn get_all_companies(&self) -> HubSpotApiResult<Vec<CrmObject>>;

    async fn search_objects(
        &self,
        object_type: CrmObjectType,
        request: &SearchRequest,
    ) -> HubSpotApiResult<SearchResponse>;

    async fn create_object(
        &self,
        object_type: CrmObjectType,
        properties: &Map<String, Value>,
    ) -> HubSpotApiResult<CrmObject>;

    async fn get_association_page(
        &self,
        object_type: CrmObjectType,
        object_id: &str,
        to_object_type: CrmObjectType,
        limit: usize,
    ) -> HubSpotApiResult<AssociationPage>;

    async fn api_request(&self, method: &str, path: &str) -> HubSpotApiResult<Value>;
}

/// Async wrapper around synchronous HubSpotClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncHubSpotClientImpl {
    client: Arc<HubSpotClient>,
}

impl AsyncHubSpotClientImpl {
    pub fn new(client: HubSpotClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// The wrapped blocking client.
    pub fn inner(&self) -> &HubSpotClient {
        &self.client
    }
}

fn join_error(e: tokio::task::JoinError) -> HubSpotApiError {
    HubSpotApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncHubSpotClient for AsyncHubSpotClientImpl {
    async fn get_all_contacts(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_all_contacts())
            .await
            .map_err(join_error)?
    }

    async fn get_all_companies(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_all_companies())
            .await
            .map_err(join_error)?
    }

    async fn search_objects(
        &self,
        object_type: CrmObjectType,
        request: &SearchRequest,
    ) -> HubSpotApiResult<SearchResponse> {
        let client = self.client.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || client.search_objects(object_type, &request))
            .await
            .map_err(join_error)?
    }

    async fn create_object(
        &self,
        object_type: CrmObjectType,
        properties: &Map<String, Value>,
    ) -> HubSpotApiResult<CrmObject> {
        let client = self.client.clone();
        let properties = properties.clone();

        tokio::task::spawn_blocking(move || client.create_object(object_type, &properties))
            .await
            .map_err(join_error)?
    }

    async fn get_association_page(
        &self,
        object_type: CrmObjectType,
        object_id: &str,
        to_object_type: CrmObjectType,
        limit: usize,
    ) -> HubSpotApiResult<AssociationPage> {
        let client = self.client.clone();
        let object_id = object_id.to_string();

        tokio::task::spawn_blocking(move || {
            client.get_association_page(object_type, &object_id, to_object_type, limit)
        })
        .await
        .map_err(join_error)?
    }

    async fn api_request(&self, method: &str, path: &str) -> HubSpotApiResult<Value> {
        let client = self.client.clone();
        let method = method.to_string();
        let path = path.to_string();

        tokio::task::spawn_blocking(move || client.api_request(&method, &path))
            .await
            .map_err(join_error)?
    }
}
