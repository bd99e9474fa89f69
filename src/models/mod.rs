//! Data models for HubSpot CRM entities.
//!
//! This module contains the record types returned by the CRM object,
//! search, association and engagement APIs, plus the dynamic value tree
//! used to carry them through normalization.

pub mod association;
pub mod crm_object;
pub mod engagement;
pub mod search;
pub mod value;

pub use association::{AssociationLink, AssociationPage};
pub use crm_object::{CrmObject, CrmObjectType};
pub use engagement::{
    CallContent, EmailContent, EngagementContent, EngagementSummary, EngagementType,
    MeetingContent, RecipientRef, TaskContent,
};
pub use search::{FilterGroup, FilterOperator, SearchFilter, SearchRequest, SearchResponse};
pub use value::CrmValue;
