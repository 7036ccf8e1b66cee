//! Scaffold Service - main application orchestrator.
//!
//! 1. Resolve the template reference against the store
//! 2. Derive the render context from the Context (rule table)
//! 3. Render into `output_dir/<project_slug>`
//! 4. Write to the filesystem, rolling back on failure

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
        services::template_service::resolve_template,
    },
    domain::{
        Context, DomainValidator as validator, FsEntry, ProjectStructure, TemplateRef, resolve,
    },
    error::BakeryResult,
};

/// Main scaffolding service.
pub struct ScaffoldService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Generate a project and write it under `output_dir/<project_slug>`.
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if the reference matches nothing
    /// - `ProjectExists` if the project root already exists; nothing is written
    /// - any filesystem error, after the partially written root was removed
    #[instrument(
        skip_all,
        fields(
            template = %template,
            slug = %context.project_slug(),
            output_dir = %output_dir.as_ref().display()
        )
    )]
    pub fn scaffold(
        &self,
        context: &Context,
        template: &TemplateRef,
        output_dir: impl AsRef<Path>,
    ) -> BakeryResult<ProjectStructure> {
        let structure = self.plan(context, template, output_dir.as_ref())?;
        self.write_structure(&structure)?;

        info!(
            files = structure.file_count(),
            directories = structure.directory_count(),
            "Scaffold completed successfully"
        );
        Ok(structure)
    }

    /// Render without touching the filesystem (dry run).
    #[instrument(skip_all, fields(template = %template, slug = %context.project_slug()))]
    pub fn preview(
        &self,
        context: &Context,
        template: &TemplateRef,
        output_dir: impl AsRef<Path>,
    ) -> BakeryResult<ProjectStructure> {
        self.plan(context, template, output_dir.as_ref())
    }

    /// Where a scaffold for `context` would be written.
    pub fn project_root(context: &Context, output_dir: impl AsRef<Path>) -> PathBuf {
        output_dir.as_ref().join(context.project_slug())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn plan(
        &self,
        context: &Context,
        reference: &TemplateRef,
        output_dir: &Path,
    ) -> BakeryResult<ProjectStructure> {
        let template = resolve_template(self.store.as_ref(), reference)?;
        validator::validate_template(&template)?;
        info!(template = %template.id, "Template resolved");

        let render_context = resolve(context);
        let root = Self::project_root(context, output_dir);

        let structure = self.renderer.render(&template, &render_context, &root)?;
        validator::validate_project_structure(&structure)?;
        debug!(entries = structure.entry_count(), "Template rendered");

        Ok(structure)
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure) -> BakeryResult<()> {
        if self.filesystem.exists(&structure.root) {
            return Err(ApplicationError::ProjectExists {
                path: structure.root.clone(),
            }
            .into());
        }

        match self.write_all(structure) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(&structure.root);
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> BakeryResult<()> {
        self.filesystem.create_dir_all(&structure.root)?;

        for entry in &structure.entries {
            match entry {
                FsEntry::Directory(dir) => {
                    let path = structure.root.join(&dir.path);
                    self.filesystem.create_dir_all(&path)?;
                }
                FsEntry::File(file) => {
                    let path = structure.root.join(&file.path);

                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    self.filesystem.write_file(&path, &file.content)?;

                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!(path = %root.display(), "Rollback successful");
        }
    }
}
