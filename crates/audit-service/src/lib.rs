//! # audit-service
//!
//! Application layer: turns requests and stream events into audit records,
//! serves filtered queries, and runs the stream listener.

pub mod dto;
pub mod listener;
pub mod services;

pub use dto::{
    AuditLogResponse, CreateAuditLogRequest, HealthChecks, HealthResponse, ListAuditLogsQuery,
    ListAuditLogsResponse, ReadinessResponse, RequestMetadata,
};
pub use listener::{AuditEnvelope, AuditListener, AuditPayload, DEFAULT_READ_BACKOFF};
pub use services::{
    AuditService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
