//! Company activity history.
//!
//! Aggregates the engagements (notes, emails, tasks, meetings, calls) linked
//! to a company into a uniform, normalized list.

use crate::client::AsyncHubSpotClient;
use crate::error::HubSpotApiResult;
use crate::models::{CrmObjectType, CrmValue, EngagementSummary};
use crate::normalize::normalize;
use crate::tools::render_json;
use std::sync::Arc;
use tracing::Instrument;

/// Maximum number of engagement links read for one company.
///
/// Only the first page of associations is requested; companies with more
/// linked engagements are truncated to this many.
pub const ENGAGEMENT_ASSOCIATION_LIMIT: usize = 500;

/// Path of the legacy engagement detail endpoint.
pub fn engagement_path(engagement_id: &str) -> String {
    format!(
        "/engagements/v1/engagements/{}",
        urlencoding::encode(engagement_id)
    )
}

/// Activity tools for companies.
pub struct CompanyActivityTools {
    client: Arc<dyn AsyncHubSpotClient>,
    span: tracing::Span,
}

impl CompanyActivityTools {
    /// Create new activity tools.
    ///
    /// # Arguments
    /// * `client` - CRM client used for association and engagement lookups
    /// * `span` - span every event of this component is recorded under
    pub fn new(client: Arc<dyn AsyncHubSpotClient>, span: tracing::Span) -> Self {
        Self { client, span }
    }

    /// Fetch and format every engagement linked to a company.
    ///
    /// Links are read from a single association page, then each engagement
    /// is fetched one at a time in link order. Any failure, including a
    /// detail body that is not a JSON object, aborts the whole call.
    pub async fn fetch_company_activity(
        &self,
        company_id: &str,
    ) -> HubSpotApiResult<Vec<EngagementSummary>> {
        async {
            let page = self
                .client
                .get_association_page(
                    CrmObjectType::Companies,
                    company_id,
                    CrmObjectType::Engagements,
                    ENGAGEMENT_ASSOCIATION_LIMIT,
                )
                .await?;

            let engagement_ids = page.target_ids();
            tracing::debug!(
                company_id = %company_id,
                links = engagement_ids.len(),
                "Resolved engagement associations"
            );

            let mut activities = Vec::with_capacity(engagement_ids.len());
            for engagement_id in &engagement_ids {
                let response = self
                    .client
                    .api_request("GET", &engagement_path(engagement_id))
                    .await?;

                let summary = EngagementSummary::from_response(&response).map_err(|e| {
                    tracing::warn!(engagement_id = %engagement_id, error = %e, "Malformed engagement");
                    e
                })?;
                tracing::trace!(
                    engagement_id = %engagement_id,
                    kind = ?summary.engagement_type(),
                    "Formatted engagement"
                );
                activities.push(summary);
            }

            Ok(activities)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Activity history of a company as JSON text.
    ///
    /// Returns a JSON list of engagement summaries, or `{"error": "..."}`
    /// when any CRM call fails. Never returns an error itself.
    pub async fn get_company_activity(&self, company_id: &str) -> String {
        let result = self.fetch_company_activity(company_id).await.map(|activities| {
            normalize(CrmValue::List(
                activities.into_iter().map(CrmValue::from).collect(),
            ))
        });

        self.span
            .in_scope(|| render_json("get_company_activity", result))
    }
}
