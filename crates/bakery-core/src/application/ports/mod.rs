//! Application ports (traits) for external dependencies.
//!
//! - **Driven (Output) Ports**: called by services, implemented by `bakery-adapters`
//!   - `Filesystem`: file operations
//!   - `TemplateStore`: template storage/retrieval
//!   - `TemplateRenderer`: template rendering

pub mod output;

pub use output::{Filesystem, TemplateRenderer, TemplateStore};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateStore};
