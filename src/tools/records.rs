//! Contact and company record tools.
//!
//! Lists full collections as normalized JSON and creates new records after
//! checking for an existing match.

use crate::client::AsyncHubSpotClient;
use crate::error::HubSpotApiResult;
use crate::models::{CrmObject, CrmObjectType, CrmValue, SearchFilter, SearchRequest};
use crate::normalize::normalize;
use crate::tools::render_json;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::Instrument;

/// Parameters for creating a contact.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub firstname: String,
    pub lastname: String,
    pub email: Option<String>,

    /// Extra properties; these win over the named fields on conflict
    pub properties: Option<Map<String, Value>>,
}

impl NewContact {
    /// Value of `properties.company`, when given as a non-empty string.
    pub fn company(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.get("company"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Filters identifying a duplicate of this contact.
    pub fn duplicate_filters(&self) -> Vec<SearchFilter> {
        let mut filters = vec![
            SearchFilter::eq("firstname", self.firstname.clone()),
            SearchFilter::eq("lastname", self.lastname.clone()),
        ];
        if let Some(company) = self.company() {
            filters.push(SearchFilter::eq("company", company));
        }
        filters
    }

    /// Property mapping sent to the create endpoint.
    pub fn into_properties(self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("firstname".to_string(), Value::String(self.firstname));
        properties.insert("lastname".to_string(), Value::String(self.lastname));
        if let Some(email) = self.email {
            properties.insert("email".to_string(), Value::String(email));
        }
        if let Some(extra) = self.properties {
            properties.extend(extra);
        }
        properties
    }
}

/// Parameters for creating a company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub properties: Option<Map<String, Value>>,
}

impl NewCompany {
    /// Property mapping sent to the create endpoint.
    pub fn into_properties(self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(self.name));
        if let Some(extra) = self.properties {
            properties.extend(extra);
        }
        properties
    }
}

/// Result of a create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A matching record was found; nothing was created
    Existing(CrmObject),
    /// A new record was created
    Created(CrmObject),
}

impl CreateOutcome {
    pub fn record(&self) -> &CrmObject {
        match self {
            CreateOutcome::Existing(record) | CreateOutcome::Created(record) => record,
        }
    }

    /// Tool text for this outcome. `label` names the record kind, e.g. "Contact".
    pub fn render(&self, label: &str) -> String {
        let record = record_json(self.record());
        match self {
            CreateOutcome::Existing(_) => format!("{} already exists: {}", label, record),
            CreateOutcome::Created(_) => record,
        }
    }
}

/// A single record as normalized JSON text.
pub fn record_json(record: &CrmObject) -> String {
    serde_json::to_string(&normalize(record.to_value())).unwrap_or_else(|e| {
        tracing::error!(record_id = %record.id, error = %e, "Failed to serialize record");
        super::error_json(e)
    })
}

/// Render a create result as tool text.
pub fn render_creation(label: &str, result: HubSpotApiResult<CreateOutcome>) -> String {
    match result {
        Ok(outcome) => outcome.render(label),
        Err(e) => {
            tracing::error!(record_kind = %label, error = %e, "Create request failed");
            format!("HubSpot API error: {}", e)
        }
    }
}

/// Record tools for contacts and companies.
pub struct CrmRecordTools {
    client: Arc<dyn AsyncHubSpotClient>,
    span: tracing::Span,
}

impl CrmRecordTools {
    /// Create new record tools.
    pub fn new(client: Arc<dyn AsyncHubSpotClient>, span: tracing::Span) -> Self {
        Self { client, span }
    }

    /// All contacts as normalized JSON text, or `{"error": "..."}`.
    pub async fn get_contacts(&self) -> String {
        let result = self
            .client
            .get_all_contacts()
            .instrument(self.span.clone())
            .await
            .map(records_value);

        self.span.in_scope(|| render_json("get_contacts", result))
    }

    /// All companies as normalized JSON text, or `{"error": "..."}`.
    pub async fn get_companies(&self) -> String {
        let result = self
            .client
            .get_all_companies()
            .instrument(self.span.clone())
            .await
            .map(records_value);

        self.span.in_scope(|| render_json("get_companies", result))
    }

    /// Create a contact unless one with the same name (and company) exists.
    pub async fn create_contact(&self, contact: NewContact) -> HubSpotApiResult<CreateOutcome> {
        let filters = contact.duplicate_filters();
        self.create_unless_exists(CrmObjectType::Contacts, filters, contact.into_properties())
            .await
    }

    /// Create a company unless one with the same name exists.
    pub async fn create_company(&self, company: NewCompany) -> HubSpotApiResult<CreateOutcome> {
        let filters = vec![SearchFilter::eq("name", company.name.clone())];
        self.create_unless_exists(CrmObjectType::Companies, filters, company.into_properties())
            .await
    }

    async fn create_unless_exists(
        &self,
        object_type: CrmObjectType,
        filters: Vec<SearchFilter>,
        properties: Map<String, Value>,
    ) -> HubSpotApiResult<CreateOutcome> {
        async {
            let search = SearchRequest::all_of(filters);
            let found = self.client.search_objects(object_type, &search).await?;

            if found.total > 0 {
                if let Some(existing) = found.results.into_iter().next() {
                    tracing::info!(
                        object_type = %object_type,
                        record_id = %existing.id,
                        "Matching record already exists"
                    );
                    return Ok(CreateOutcome::Existing(existing));
                }
            }

            let created = self.client.create_object(object_type, &properties).await?;
            Ok(CreateOutcome::Created(created))
        }
        .instrument(self.span.clone())
        .await
    }
}

fn records_value(records: Vec<CrmObject>) -> CrmValue {
    normalize(CrmValue::List(records.iter().map(CrmObject::to_value).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn test_contact_duplicate_filters_without_company() {
        let contact = NewContact {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            ..Default::default()
        };

        let filters = contact.duplicate_filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].property_name, "firstname");
        assert_eq!(filters[1].value, "Lovelace");
    }

    #[test]
    fn test_contact_duplicate_filters_with_company() {
        let contact = NewContact {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: None,
            properties: props(json!({"company": "Analytical Engines"})),
        };

        let filters = contact.duplicate_filters();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[2].property_name, "company");
        assert_eq!(filters[2].value, "Analytical Engines");
    }

    #[test]
    fn test_contact_properties_override_named_fields() {
        let contact = NewContact {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            properties: props(json!({"email": "countess@example.com", "phone": "123"})),
        };

        let properties = contact.into_properties();
        assert_eq!(properties["firstname"], "Ada");
        assert_eq!(properties["email"], "countess@example.com");
        assert_eq!(properties["phone"], "123");
    }

    #[test]
    fn test_company_properties() {
        let company = NewCompany {
            name: "Acme".to_string(),
            properties: props(json!({"domain": "acme.test"})),
        };

        let properties = company.into_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties["name"], "Acme");
    }

    #[test]
    fn test_render_outcomes() {
        let record = CrmObject {
            id: "9".to_string(),
            ..Default::default()
        };

        let existing = CreateOutcome::Existing(record.clone()).render("Contact");
        assert!(existing.starts_with("Contact already exists: {"));
        assert!(existing.contains("\"id\":\"9\""));

        let created = CreateOutcome::Created(record).render("Contact");
        let parsed: Value = serde_json::from_str(&created).unwrap();
        assert_eq!(parsed["id"], "9");
    }

    #[test]
    fn test_render_creation_error() {
        let text = render_creation(
            "Company",
            Err(crate::error::HubSpotApiError::RateLimitExceeded),
        );
        assert_eq!(text, "HubSpot API error: Rate limit exceeded");
    }
}
