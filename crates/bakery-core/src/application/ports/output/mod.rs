//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `bakery-adapters` crate provides implementations.

use crate::domain::{ProjectStructure, RenderContext, Template, TemplateId};
use crate::error::BakeryResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `bakery_adapters::LocalFilesystem` (production)
/// - `bakery_adapters::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BakeryResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> BakeryResult<()>;

    /// Mark a file executable (no-op where unsupported).
    fn set_permissions(&self, path: &Path, executable: bool) -> BakeryResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> BakeryResult<()>;
}

/// Port for template storage and retrieval.
///
/// Implemented by `bakery_adapters::InMemoryStore`, seeded with the built-in
/// template and any templates found on disk.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a specific template by ID.
    fn get(&self, id: &TemplateId) -> BakeryResult<Template>;

    /// Every registered version of the template called `name`.
    fn find_by_name(&self, name: &str) -> BakeryResult<Vec<Template>>;

    /// List all available templates.
    fn list(&self) -> BakeryResult<Vec<Template>>;

    /// Insert or replace a template.
    fn insert(&self, template: Template) -> BakeryResult<()>;

    /// Remove a template.
    fn remove(&self, id: &TemplateId) -> BakeryResult<()>;
}

/// Port for template rendering.
///
/// Implemented by `bakery_adapters::SimpleRenderer` (placeholder substitution
/// plus embedded content lookup).
pub trait TemplateRenderer: Send + Sync {
    /// Render a template into a project structure rooted at `output_root`.
    ///
    /// Nodes whose condition does not hold in `context` are skipped.
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> BakeryResult<ProjectStructure>;
}
