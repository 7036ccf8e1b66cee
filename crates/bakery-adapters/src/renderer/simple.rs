//! Placeholder substitution renderer.

use std::path::Path;

use bakery_core::{
    application::ports::TemplateRenderer,
    domain::{
        ContentTemplateId, DomainError, DomainValidator as validator, ProjectStructure,
        RenderContext, Template, TemplateContent, TemplateNode,
    },
    error::BakeryResult,
};
use tracing::{debug, instrument};

use crate::builtin_templates;

/// Renderer that substitutes `{{KEY}}` placeholders in paths and content and
/// resolves external content from the embedded library.
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> BakeryResult<ProjectStructure> {
        validator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);

        for node in &template.tree.nodes {
            if !context.includes(node.condition()) {
                debug!(path = %node.path(), "condition not met, skipping");
                continue;
            }

            let path = context.render(node.path().as_str());
            match node {
                TemplateNode::File(spec) => {
                    let content = render_content(&spec.content, context)?;
                    structure.add_file(path, content, spec.permissions);
                }
                TemplateNode::Directory(spec) => {
                    structure.add_directory(path, spec.permissions);
                }
            }
        }

        validator::validate_project_structure(&structure)?;

        Ok(structure)
    }
}

fn render_content(content: &TemplateContent, ctx: &RenderContext) -> Result<String, DomainError> {
    match content {
        TemplateContent::Literal(source) => Ok(source.as_str().to_string()),
        TemplateContent::Parameterized(source) => Ok(ctx.render(source.as_str())),
        TemplateContent::External(id) => render_external(id, ctx),
    }
}

/// The id itself may carry placeholders (`license:{{LICENSE}}`).
fn render_external(id: &ContentTemplateId, ctx: &RenderContext) -> Result<String, DomainError> {
    let resolved = ctx.render(id.as_str());
    let body = builtin_templates::embedded_content(&resolved)
        .ok_or(DomainError::UnknownContent { id: resolved })?;
    Ok(ctx.render(body))
}
