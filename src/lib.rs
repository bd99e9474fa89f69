//! HubSpot MCP Server - A Rust implementation of the Model Context Protocol server for the HubSpot CRM.
//!
//! This library provides an MCP server that lets AI assistants list and create
//! HubSpot contacts and companies, and read the activity history of a company.
//!
//! # Architecture
//!
//! - **models**: CRM records, engagements, search and association shapes
//! - **normalize**: Converts temporal values into JSON-safe strings
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration from the command line and environment variables
//! - **client**: HTTP client for the HubSpot API
//! - **tools**: Record and company-activity operations
//! - **server**: MCP protocol server

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod server;
pub mod tools;

// Re-export commonly used types
pub use client::{AsyncHubSpotClient, AsyncHubSpotClientImpl, HubSpotClient};
pub use config::Config;
pub use error::{ConfigError, HubSpotApiError, HubSpotApiResult};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{CrmObject, CrmObjectType, CrmValue, EngagementSummary, EngagementType};
pub use normalize::normalize;
pub use server::HubSpotMcpServer;
pub use tools::{CompanyActivityTools, CreateOutcome, CrmRecordTools, NewCompany, NewContact};
