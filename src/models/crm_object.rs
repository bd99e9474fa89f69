//! Contact and company records from the HubSpot CRM v3 object API.

use crate::models::value::CrmValue;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// CRM object types addressable through the object and association APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrmObjectType {
    Contacts,
    Companies,
    Engagements,
}

impl CrmObjectType {
    /// Path segment used by the HubSpot API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrmObjectType::Contacts => "contacts",
            CrmObjectType::Companies => "companies",
            CrmObjectType::Engagements => "engagements",
        }
    }
}

impl std::fmt::Display for CrmObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact or company as returned by the CRM object endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CrmObject {
    /// Record ID
    pub id: String,

    /// Property name to value (HubSpot sends strings or null)
    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

impl CrmObject {
    /// Look up a property as a string.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// Convert to a plain mapping with typed timestamps, ready for normalization.
    pub fn to_value(&self) -> CrmValue {
        let properties = CrmValue::map(
            self.properties
                .iter()
                .map(|(k, v)| (k.clone(), CrmValue::from(v.clone()))),
        );

        CrmValue::map([
            ("id", CrmValue::from(self.id.as_str())),
            ("properties", properties),
            ("created_at", CrmValue::from(self.created_at)),
            ("updated_at", CrmValue::from(self.updated_at)),
            ("archived", CrmValue::from(self.archived)),
            ("archived_at", CrmValue::from(self.archived_at)),
        ])
    }
}
