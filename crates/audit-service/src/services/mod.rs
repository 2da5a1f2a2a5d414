//! Business logic services

pub mod audit;
pub mod context;
pub mod error;

pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
