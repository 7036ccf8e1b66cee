//! Infrastructure adapters for Bakery.
//!
//! Implements the ports defined in `bakery_core::application::ports`: the
//! filesystem, the template store and the renderer. Built-in templates are
//! embedded here as well.

pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use template_loader::FilesystemTemplateLoader;
pub use template_store::InMemoryStore;
