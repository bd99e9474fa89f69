//! MCP tools for interacting with the HubSpot CRM.
//!
//! This module provides two categories of tools:
//! - **Records**: List and create contacts and companies
//! - **Activity**: Aggregate the engagement history of a company

pub mod activity;
pub mod records;

pub use activity::{CompanyActivityTools, ENGAGEMENT_ASSOCIATION_LIMIT};
pub use records::{CreateOutcome, CrmRecordTools, NewCompany, NewContact};

use crate::error::HubSpotApiResult;
use crate::models::CrmValue;

/// Error object returned by read operations.
pub fn error_json(message: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": message.to_string() }).to_string()
}

/// Render the result of a read operation as JSON text.
///
/// Failures are logged and turned into `{"error": "..."}`.
pub(crate) fn render_json(operation: &str, result: HubSpotApiResult<CrmValue>) -> String {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(operation = %operation, error = %e, "Failed to serialize result");
                error_json(e)
            }
        },
        Err(e) => {
            tracing::error!(operation = %operation, error = %e, "CRM request failed");
            error_json(e)
        }
    }
}
