use async_trait::async_trait;
use hubspot_mcp_server::client::AsyncHubSpotClient;
use hubspot_mcp_server::error::{HubSpotApiError, HubSpotApiResult};
use hubspot_mcp_server::models::{
    AssociationLink, AssociationPage, CrmObject, CrmObjectType, SearchRequest, SearchResponse,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    contacts: Vec<CrmObject>,
    companies: Vec<CrmObject>,
    search_matches: HashMap<&'static str, Vec<CrmObject>>,
    searches: Vec<(CrmObjectType, SearchRequest)>,
    created: Vec<(CrmObjectType, Map<String, Value>)>,
    associations: HashMap<String, Vec<String>>,
    association_limits: Vec<usize>,
    responses: HashMap<String, Value>,
    requested_paths: Vec<String>,
    failing: HashSet<&'static str>,
    call_counts: HashMap<&'static str, usize>,
}

/// Mock CRM client for testing.
///
/// Provides an in-memory implementation of AsyncHubSpotClient that can be
/// configured with records, associations and raw responses, records every
/// call, and can be told to fail individual operations.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockHubSpotClient {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockHubSpotClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contact(&self, contact: CrmObject) {
        self.state.lock().unwrap().contacts.push(contact);
    }

    pub fn add_company(&self, company: CrmObject) {
        self.state.lock().unwrap().companies.push(company);
    }

    /// Records returned by any search on `object_type`.
    pub fn set_search_matches(&self, object_type: CrmObjectType, matches: Vec<CrmObject>) {
        self.state
            .lock()
            .unwrap()
            .search_matches
            .insert(object_type.as_str(), matches);
    }

    /// Link a company to engagements, in order.
    pub fn link_engagements(&self, company_id: &str, engagement_ids: &[&str]) {
        self.state.lock().unwrap().associations.insert(
            company_id.to_string(),
            engagement_ids.iter().map(|id| id.to_string()).collect(),
        );
    }

    /// Response body served for a raw GET of `path`.
    pub fn set_response(&self, path: &str, body: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(path.to_string(), body);
    }

    /// Make every call to `method` fail.
    pub fn fail_on(&self, method: &'static str) {
        self.state.lock().unwrap().failing.insert(method);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        *self
            .state
            .lock()
            .unwrap()
            .call_counts
            .get(method)
            .unwrap_or(&0)
    }

    pub fn searches(&self) -> Vec<(CrmObjectType, SearchRequest)> {
        self.state.lock().unwrap().searches.clone()
    }

    pub fn created(&self) -> Vec<(CrmObjectType, Map<String, Value>)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().requested_paths.clone()
    }

    pub fn association_limits(&self) -> Vec<usize> {
        self.state.lock().unwrap().association_limits.clone()
    }

    fn track_call(&self, method: &'static str) -> HubSpotApiResult<()> {
        let mut state = self.state.lock().unwrap();
        *state.call_counts.entry(method).or_insert(0) += 1;
        if state.failing.contains(method) {
            return Err(HubSpotApiError::ApiError {
                status: 500,
                message: format!("{} failed", method),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AsyncHubSpotClient for MockHubSpotClient {
    async fn get_all_contacts(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        self.track_call("get_all_contacts")?;
        Ok(self.state.lock().unwrap().contacts.clone())
    }

    async fn get_all_companies(&self) -> HubSpotApiResult<Vec<CrmObject>> {
        self.track_call("get_all_companies")?;
        Ok(self.state.lock().unwrap().companies.clone())
    }

    async fn search_objects(
        &self,
        object_type: CrmObjectType,
        request: &SearchRequest,
    ) -> HubSpotApiResult<SearchResponse> {
        self.track_call("search_objects")?;

        let mut state = self.state.lock().unwrap();
        state.searches.push((object_type, request.clone()));
        let results = state
            .search_matches
            .get(object_type.as_str())
            .cloned()
            .unwrap_or_default();

        Ok(SearchResponse {
            total: results.len() as u64,
            results,
        })
    }

    async fn create_object(
        &self,
        object_type: CrmObjectType,
        properties: &Map<String, Value>,
    ) -> HubSpotApiResult<CrmObject> {
        self.track_call("create_object")?;

        let mut state = self.state.lock().unwrap();
        state.created.push((object_type, properties.clone()));

        Ok(CrmObject {
            id: format!("new-{}", state.created.len()),
            properties: properties.clone(),
            ..Default::default()
        })
    }

    async fn get_association_page(
        &self,
        _object_type: CrmObjectType,
        object_id: &str,
        _to_object_type: CrmObjectType,
        limit: usize,
    ) -> HubSpotApiResult<AssociationPage> {
        self.track_call("get_association_page")?;

        let mut state = self.state.lock().unwrap();
        state.association_limits.push(limit);
        let results = state
            .associations
            .get(object_id)
            .map(|ids| {
                ids.iter()
                    .map(|id| AssociationLink {
                        to_object_id: id.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(AssociationPage { results })
    }

    async fn api_request(&self, _method: &str, path: &str) -> HubSpotApiResult<Value> {
        self.track_call("api_request")?;

        let mut state = self.state.lock().unwrap();
        state.requested_paths.push(path.to_string());
        state
            .responses
            .get(path)
            .cloned()
            .ok_or_else(|| HubSpotApiError::NotFound(path.to_string()))
    }
}
