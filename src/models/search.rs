//! Request and response shapes for the CRM search endpoint.

use crate::models::crm_object::CrmObject;
use serde::{Deserialize, Serialize};

/// Comparison operator for a search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOperator {
    #[serde(rename = "EQ")]
    Eq,
}

/// A single `property OP value` condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub property_name: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl SearchFilter {
    /// Exact-match filter.
    pub fn eq(property_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            operator: FilterOperator::Eq,
            value: value.into(),
        }
    }
}

/// Filters inside a group are AND-ed; groups are OR-ed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterGroup {
    pub filters: Vec<SearchFilter>,
}

/// Body of `POST /crm/v3/objects/{type}/search`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub filter_groups: Vec<FilterGroup>,
}

impl SearchRequest {
    /// A request with one group AND-ing all the given filters.
    pub fn all_of(filters: Vec<SearchFilter>) -> Self {
        Self {
            filter_groups: vec![FilterGroup { filters }],
        }
    }
}

/// Search result: total match count plus the first page of records.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub results: Vec<CrmObject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_serialization() {
        let request = SearchRequest::all_of(vec![
            SearchFilter::eq("firstname", "Ada"),
            SearchFilter::eq("lastname", "Lovelace"),
        ]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "filterGroups": [{
                    "filters": [
                        {"propertyName": "firstname", "operator": "EQ", "value": "Ada"},
                        {"propertyName": "lastname", "operator": "EQ", "value": "Lovelace"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_search_response_defaults() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
    }
}
