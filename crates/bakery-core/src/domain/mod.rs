//! Core domain layer for Bakery.
//!
//! Pure logic only: no filesystem, no clock, no environment. Everything that
//! touches the outside world goes through the ports in `crate::application`.
//!
//! - [`context`]: the validated option set for one invocation
//! - [`rules`]: the rule table deciding optional files and text fragments
//! - [`entities`]: template model and rendered project structure
//! - [`value_objects`]: closed option domains (license, CLI, formatter, ...)

pub mod context;
pub mod entities;
pub mod error;
pub mod rules;
pub mod value_objects;

mod validation;

pub use context::{Context, ContextBuilder, defaults, derive_slug};
pub use entities::{
    common::{Permissions, RelativePath},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    template::{
        ContentTemplateId, DirectorySpec, FileSpec, RenderContext, Template, TemplateBuilder,
        TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateRef, TemplateSource,
        TemplateTree,
    },
};
pub use error::{DomainError, ErrorCategory};
pub use rules::{Condition, FRAGMENT_RULES, FragmentRule, resolve};
pub use validation::DomainValidator;
pub use value_objects::{CliFramework, Formatter, License, TestFramework, keys, parse_bool};
