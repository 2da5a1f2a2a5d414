//! Data Transfer Objects for API requests and responses

pub mod mappers;
pub(crate) mod nullable;
pub mod requests;
pub mod responses;

pub use requests::{CreateAuditLogRequest, ListAuditLogsQuery, RequestMetadata};
pub use responses::{
    AuditLogResponse, HealthChecks, HealthResponse, ListAuditLogsResponse, ReadinessResponse,
};
