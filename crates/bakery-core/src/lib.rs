//! Bakery Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the Bakery Python package scaffolder.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           bakery-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ScaffoldService, TemplateService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Store, Filesystem, Render)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      bakery-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Context, rule table, Template, ...)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bakery_core::prelude::*;
//!
//! let context = Context::builder(2026)
//!     .project_name("Data Tools")
//!     .cli(CliFramework::Typer)
//!     .build()?;
//!
//! let service = ScaffoldService::new(store, renderer, filesystem);
//! service.scaffold(&context, &TemplateRef::named("python-package"), "./output")?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ScaffoldService, TemplateInfo, TemplateService,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        CliFramework, Condition, Context, ContextBuilder, Formatter, License, ProjectStructure,
        RenderContext, Template, TemplateId, TemplateMetadata, TemplateRef, TestFramework,
    };
    pub use crate::error::{BakeryError, BakeryResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
