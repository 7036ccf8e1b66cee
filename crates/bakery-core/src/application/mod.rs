//! Application layer for Bakery.
//!
//! - **Services**: use case orchestration (ScaffoldService, TemplateService)
//! - **Ports**: interface definitions for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain::rules`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ScaffoldService, TemplateInfo, TemplateService};

pub use ports::{Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
