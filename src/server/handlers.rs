//! MCP tool and resource handlers for the HubSpot server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern,
//! and serves the contact and company collections as `hubspot://` resources.

use crate::client::AsyncHubSpotClient;
use crate::tools::records::render_creation;
use crate::tools::{CompanyActivityTools, CrmRecordTools, NewCompany, NewContact};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// URI scheme of the resources this server exposes.
pub const RESOURCE_SCHEME: &str = "hubspot";

/// A readable `hubspot://` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubSpotResource {
    Contacts,
    Companies,
}

impl HubSpotResource {
    pub const ALL: [HubSpotResource; 2] = [HubSpotResource::Contacts, HubSpotResource::Companies];

    pub fn uri(&self) -> &'static str {
        match self {
            HubSpotResource::Contacts => "hubspot://hubspot_contacts",
            HubSpotResource::Companies => "hubspot://hubspot_companies",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HubSpotResource::Contacts => "HubSpot Contacts",
            HubSpotResource::Companies => "HubSpot Companies",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HubSpotResource::Contacts => {
                "List of HubSpot contacts (requires optional crm.objects.contacts.read scope)"
            }
            HubSpotResource::Companies => {
                "List of HubSpot companies (requires optional crm.objects.companies.read scope)"
            }
        }
    }

    /// Resolve a resource URI.
    ///
    /// Fails with `invalid_params` for a foreign scheme and
    /// `resource_not_found` for an unknown path.
    pub fn from_uri(uri: &str) -> Result<Self, McpError> {
        let (scheme, path) = uri.split_once("://").unwrap_or(("", uri));
        if scheme != RESOURCE_SCHEME {
            return Err(McpError::invalid_params(
                format!("Unsupported URI scheme: {}", scheme),
                Some(serde_json::json!({ "uri": uri })),
            ));
        }

        match path {
            "hubspot_contacts" => Ok(HubSpotResource::Contacts),
            "hubspot_companies" => Ok(HubSpotResource::Companies),
            _ => Err(McpError::resource_not_found(
                format!("Unknown resource path: {}", path),
                Some(serde_json::json!({ "uri": uri })),
            )),
        }
    }

    fn to_resource(self) -> Resource {
        let mut raw = RawResource::new(self.uri(), self.name());
        raw.description = Some(self.description().to_string());
        raw.mime_type = Some("application/json".to_string());
        raw.no_annotation()
    }
}

/// The HubSpot MCP server that exposes CRM tools and resources.
#[derive(Clone)]
pub struct HubSpotMcpServer {
    records: Arc<CrmRecordTools>,
    activity: Arc<CompanyActivityTools>,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for HubSpotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                resources: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "hubspot".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for the HubSpot CRM - lists and creates contacts and companies, and reports the activity history of a company.".into()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: HubSpotResource::ALL
                .iter()
                .map(|r| r.to_resource())
                .collect(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let resource = HubSpotResource::from_uri(&uri)?;
        tracing::debug!(uri = %uri, "Reading resource");

        let text = match resource {
            HubSpotResource::Contacts => self.records.get_contacts().await,
            HubSpotResource::Companies => self.records.get_companies().await,
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct CreateContactToolParams {
    /// Contact's first name
    firstname: String,
    /// Contact's last name
    lastname: String,
    /// Contact's email address
    #[serde(default)]
    email: Option<String>,
    /// Additional contact properties
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateCompanyToolParams {
    /// Company name
    name: String,
    /// Additional company properties
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CompanyIdParams {
    /// HubSpot company ID
    company_id: String,
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

// Tool router implementation
#[tool_router]
impl HubSpotMcpServer {
    /// Create a new HubSpot MCP server.
    pub fn new(client: Arc<dyn AsyncHubSpotClient>) -> Self {
        let records = Arc::new(CrmRecordTools::new(
            client.clone(),
            tracing::info_span!("crm_records"),
        ));
        let activity = Arc::new(CompanyActivityTools::new(
            client,
            tracing::info_span!("company_activity"),
        ));

        Self {
            records,
            activity,
            tool_router: Self::tool_router(),
        }
    }

    /// Get all contacts.
    #[tool(
        name = "hubspot_get_contacts",
        description = "Get contacts from HubSpot (requires optional crm.objects.contacts.read scope)"
    )]
    async fn get_contacts(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.records.get_contacts().await))
    }

    /// Create a contact unless a matching one exists.
    #[tool(
        name = "hubspot_create_contact",
        description = "Create a new contact in HubSpot (requires optional crm.objects.contacts.write scope)"
    )]
    async fn create_contact(
        &self,
        params: Parameters<CreateContactToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: hubspot_create_contact called");

        let result = self
            .records
            .create_contact(NewContact {
                firstname: params.firstname,
                lastname: params.lastname,
                email: params.email,
                properties: params.properties,
            })
            .await;

        let failed = result.is_err();
        let text = render_creation("Contact", result);
        Ok(if failed {
            CallToolResult::error(vec![Content::text(text)])
        } else {
            text_result(text)
        })
    }

    /// Get all companies.
    #[tool(
        name = "hubspot_get_companies",
        description = "Get companies from HubSpot (requires optional crm.objects.companies.read scope)"
    )]
    async fn get_companies(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.records.get_companies().await))
    }

    /// Create a company unless one with the same name exists.
    #[tool(
        name = "hubspot_create_company",
        description = "Create a new company in HubSpot (requires optional crm.objects.companies.write scope)"
    )]
    async fn create_company(
        &self,
        params: Parameters<CreateCompanyToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: hubspot_create_company called");

        let result = self
            .records
            .create_company(NewCompany {
                name: params.name,
                properties: params.properties,
            })
            .await;

        let failed = result.is_err();
        let text = render_creation("Company", result);
        Ok(if failed {
            CallToolResult::error(vec![Content::text(text)])
        } else {
            text_result(text)
        })
    }

    /// Get the activity history of a company.
    #[tool(
        name = "hubspot_get_company_activity",
        description = "Get activity history for a specific company (requires optional crm.objects.companies.read scope)"
    )]
    async fn get_company_activity(
        &self,
        params: Parameters<CompanyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::debug!(company_id = %params.company_id, "MCP Handler: hubspot_get_company_activity called");

        Ok(text_result(
            self.activity.get_company_activity(&params.company_id).await,
        ))
    }
}
