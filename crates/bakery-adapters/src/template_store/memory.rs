//! In-memory template store seeded with the built-in templates.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use bakery_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Template, TemplateId},
    error::BakeryResult,
};
use tracing::debug;

use crate::builtin_templates;

/// Thread-safe in-memory template store keyed by `name@version`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<TemplateId, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the templates compiled into the binary.
    pub fn with_builtin() -> BakeryResult<Self> {
        let store = Self::new();
        for template in builtin_templates::builtin()? {
            store.insert(template)?;
        }
        Ok(store)
    }

    /// Built-in templates plus any discovered in `templates_dir` and
    /// `$BAKERY_TEMPLATES_DIR`. Discovered templates replace built-ins with
    /// the same id.
    pub fn with_templates_dir(templates_dir: Option<&Path>) -> BakeryResult<Self> {
        let store = Self::new();
        for template in builtin_templates::all_templates(templates_dir)? {
            store.insert(template)?;
        }
        debug!(count = store.len(), "template store ready");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> BakeryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, id: &TemplateId) -> BakeryResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                reference: id.to_string(),
            }
            .into()
        })
    }

    fn find_by_name(&self, name: &str) -> BakeryResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .values()
            .filter(|t| t.id.name() == name)
            .cloned()
            .collect())
    }

    fn list(&self) -> BakeryResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, template: Template) -> BakeryResult<()> {
        validator::validate_template(&template)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(template.id.clone(), template);
        Ok(())
    }

    fn remove(&self, id: &TemplateId) -> BakeryResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.remove(id).map(|_| ()).ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                reference: id.to_string(),
            }
            .into()
        })
    }
}
