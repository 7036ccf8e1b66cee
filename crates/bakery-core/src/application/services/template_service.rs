//! Template Service - template management operations.
//!
//! Handles listing, registration and reference resolution over the store port.

use serde::Serialize;
use tracing::debug;

use crate::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{Template, TemplateRef},
    error::BakeryResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
    pub nodes: usize,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.metadata.name.clone(),
            version: t.id.version().to_string(),
            description: t.metadata.description.clone(),
            author: t.metadata.author.clone(),
            tags: t.metadata.tags.clone(),
            nodes: t.tree.len(),
        }
    }
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Validate and add (or replace) a template.
    pub fn save(&self, template: Template) -> BakeryResult<()> {
        template.validate()?;
        self.store.insert(template)
    }

    pub fn find_by_name(&self, name: &str) -> BakeryResult<Vec<Template>> {
        self.store.find_by_name(name)
    }

    /// Every registered template, sorted by id.
    pub fn list_templates(&self) -> BakeryResult<Vec<TemplateInfo>> {
        let mut infos: Vec<TemplateInfo> =
            self.store.list()?.iter().map(TemplateInfo::from).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }

    /// Resolve `name` or `name@version` to a single template.
    pub fn resolve(&self, reference: &TemplateRef) -> BakeryResult<Template> {
        resolve_template(self.store.as_ref(), reference)
    }
}

/// Pick the template a reference points at: the exact version when pinned,
/// otherwise the highest registered version.
pub(crate) fn resolve_template(
    store: &dyn TemplateStore,
    reference: &TemplateRef,
) -> BakeryResult<Template> {
    let candidates = store.find_by_name(&reference.name)?;
    debug!(
        reference = %reference,
        candidates = candidates.len(),
        "resolving template"
    );

    candidates
        .into_iter()
        .filter(|t| reference.matches(&t.id))
        .max_by(|a, b| a.id.cmp_version(&b.id))
        .ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                reference: reference.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateStore;
    use crate::domain::{
        FileSpec, TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateTree,
    };
    use crate::error::BakeryError;

    fn template(name: &str, version: &str) -> Template {
        Template::builder()
            .id(TemplateId::new(name, version))
            .metadata(TemplateMetadata::new(name).tags(vec!["python".into()]))
            .add_node(TemplateNode::File(FileSpec::new(
                "README.md",
                TemplateContent::Parameterized("# {{PROJECT_NAME}}\n".into()),
            )))
            .build()
            .unwrap()
    }

    fn store_with(templates: Vec<Template>) -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        let listed = templates.clone();
        store.expect_list().returning(move || Ok(listed.clone()));
        store.expect_find_by_name().returning(move |name| {
            Ok(templates
                .iter()
                .filter(|t| t.id.name() == name)
                .cloned()
                .collect())
        });
        store
    }

    #[test]
    fn list_templates_is_sorted_by_id() {
        let service = TemplateService::new(Box::new(store_with(vec![
            template("zeta", "1.0.0"),
            template("alpha", "2.0.0"),
        ])));

        let infos = service.list_templates().unwrap();
        let ids: Vec<_> = infos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["alpha@2.0.0", "zeta@1.0.0"]);
        assert_eq!(infos[0].tags, ["python"]);
        assert_eq!(infos[0].nodes, 1);
    }

    #[test]
    fn resolve_prefers_highest_version_unless_pinned() {
        let service = TemplateService::new(Box::new(store_with(vec![
            template("python-package", "1.9.0"),
            template("python-package", "1.10.0"),
        ])));

        let latest = service.resolve(&TemplateRef::named("python-package")).unwrap();
        assert_eq!(latest.id.version(), "1.10.0");

        let pinned = service
            .resolve(&"python-package@1.9.0".parse().unwrap())
            .unwrap();
        assert_eq!(pinned.id.version(), "1.9.0");
        assert_eq!(service.find_by_name("python-package").unwrap().len(), 2);
    }

    #[test]
    fn resolve_unknown_reference_fails() {
        let service = TemplateService::new(Box::new(store_with(vec![template("a", "1.0.0")])));
        let err = service
            .resolve(&"a@2.0.0".parse().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            BakeryError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn save_validates_before_inserting() {
        let mut store = MockTemplateStore::new();
        store.expect_insert().times(1).returning(|_| Ok(()));
        let service = TemplateService::new(Box::new(store));

        service.save(template("a", "1.0.0")).unwrap();

        let empty = Template {
            id: TemplateId::new("empty", "1.0.0"),
            metadata: TemplateMetadata::new("empty"),
            tree: TemplateTree::new(),
        };
        assert!(service.save(empty).is_err());
    }
}
