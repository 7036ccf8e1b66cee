//! Template domain aggregate and rendering context.
//!
//! - `Literal` skips substitution entirely (`.gitignore`, static docs).
//! - `Parameterized` runs through [`RenderContext::render`].
//! - `External` names embedded content (`license:{{LICENSE}}`). The id itself
//!   is rendered first, then resolved by the renderer adapter, then rendered
//!   again as a parameterized body.
//!
//! Paths may contain placeholders too (`src/{{PROJECT_SLUG}}/cli.py`).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    rules::Condition,
};

// ============================================================================
// Render Context
// ============================================================================

/// Everything a renderer needs to turn a [`Template`] into files.
///
/// Built from a [`Context`](crate::domain::Context) by
/// [`rules::resolve`](crate::domain::rules::resolve): the standard variables,
/// the fragment slots filled by the rule table, and the set of inclusion
/// conditions that hold. Immutable after creation; `with_*` return new values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Variable map for substitution. Ordered so debug output and
    /// `variables()` iteration are stable.
    variables: BTreeMap<String, String>,

    /// Inclusion conditions that evaluated to true.
    conditions: BTreeSet<Condition>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable, consuming self.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Mark a condition as holding, consuming self.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.insert(condition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn holds(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Whether a node guarded by `condition` belongs in the output.
    /// Unguarded nodes are always included.
    pub fn includes(&self, condition: Option<Condition>) -> bool {
        condition.is_none_or(|c| self.holds(c))
    }

    /// Replace `{{KEY}}` placeholders in a single left-to-right pass.
    ///
    /// - `{{UNKNOWN}}` stays as literal `{{UNKNOWN}}`
    /// - whitespace inside the braces is ignored: `{{ KEY }}` == `{{KEY}}`
    /// - substituted values are never rescanned, so a value containing
    ///   `{{...}}` is emitted verbatim
    /// - an unterminated `{{` is copied through unchanged
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            let Some(end) = after_open.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = after_open[..end].trim();
            match self.variables.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// Convert a string to PascalCase.
///
/// | Input | Output |
/// |-------|--------|
/// | "python_boilerplate" | "PythonBoilerplate" |
/// | "my-app" | "MyApp" |
/// | "HTTPRequest" | "HttpRequest" |
pub(crate) fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split a string into lowercase words on separators and case changes.
///
/// 1. `_`, `-`, whitespace always split
/// 2. camelCase transition: `aB` splits between `a` and `B`
/// 3. acronym boundary: `HTTPRequest` splits between `P` and `R`
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

// ============================================================================
// Template Identity
// ============================================================================

/// Unique identifier for a template: `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Create a new template ID.
    ///
    /// Callers with untrusted input should go through [`TemplateId::parse`].
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.contains('@'), "Template name cannot contain @: {name}");
        Self {
            name,
            version: version.into(),
        }
    }

    /// Parse from `name@version`.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` if there is not exactly one `@` or either side is empty.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version))
                if !name.is_empty() && !version.is_empty() && !version.contains('@') =>
            {
                Ok(Self::new(name, version))
            }
            _ => Err(DomainError::InvalidTemplate(format!(
                "Invalid template ID format: {s}. Expected 'name@version'"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Compare versions numerically segment by segment (`1.10.0 > 1.9.0`).
    /// Non-numeric segments compare as text.
    pub fn cmp_version(&self, other: &Self) -> Ordering {
        let mut left = self.version.split('.');
        let mut right = other.version.split('.');
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(a), Some(b)) => {
                    let ord = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        _ => a.cmp(b),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A user-facing template reference: `name` or `name@version`.
///
/// Without a version the newest registered version is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub name: String,
    pub version: Option<String>,
}

impl TemplateRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn matches(&self, id: &TemplateId) -> bool {
        self.name == id.name()
            && self.version.as_deref().is_none_or(|v| v == id.version())
    }
}

impl FromStr for TemplateRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template reference cannot be empty".into(),
            ));
        }
        if s.contains('@') {
            let id = TemplateId::parse(s)?;
            return Ok(Self {
                name: id.name,
                version: Some(id.version),
            });
        }
        Ok(Self::named(s))
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// A reusable project blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id.name` is non-empty
/// 2. `metadata.name` is non-empty
/// 3. `tree` is non-empty
/// 4. All paths in `tree` are unique
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template name cannot be empty".into(),
            ));
        }

        if self.metadata.name.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for node in &self.tree.nodes {
            let path = node.path().as_str();
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for templates; `build()` checks required fields.
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the entire tree at once (replaces any previous nodes).
    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    /// # Errors
    ///
    /// - `InvalidTemplate` if the tree is empty
    /// - `MissingRequiredField` if id or metadata is not set
    pub fn build(self) -> Result<Template, DomainError> {
        if self.tree.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template tree cannot be empty".into(),
            ));
        }

        Ok(Template {
            id: self
                .id
                .ok_or(DomainError::MissingRequiredField { field: "id" })?,
            metadata: self
                .metadata
                .ok_or(DomainError::MissingRequiredField { field: "metadata" })?,
            tree: self.tree,
        })
    }
}

// ============================================================================
// Template Metadata
// ============================================================================

/// Human-readable information about a template, shown by `bakery list`.
#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            author: "Bakery".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Ordered filesystem nodes to create. Directories come before their files.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }

    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::File(f) => f.condition,
            Self::Directory(d) => d.condition,
        }
    }
}

/// Specification for a file to create.
#[derive(Debug, Clone)]
pub struct FileSpec {
    /// Relative path from project root; may contain placeholders.
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
    /// Inclusion rule; `None` means always included.
    pub condition: Option<Condition>,
}

impl FileSpec {
    pub fn new(path: impl Into<RelativePath>, content: TemplateContent) -> Self {
        Self {
            path: path.into(),
            content,
            permissions: Permissions::read_write(),
            condition: None,
        }
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }

    /// Only include this file when `condition` holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
    pub permissions: Permissions,
    pub condition: Option<Condition>,
}

impl DirectorySpec {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self {
            path: path.into(),
            permissions: Permissions::read_write(),
            condition: None,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

// ============================================================================
// Content Types
// ============================================================================

#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Content used exactly as provided.
    Literal(TemplateSource),

    /// Content with `{{VARIABLE}}` placeholders to be substituted.
    Parameterized(TemplateSource),

    /// Reference to embedded content, resolved by the renderer.
    External(ContentTemplateId),
}

/// Source of template content: compile-time or loaded at runtime.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compile-time string (`include_str!`).
    Static(&'static str),

    /// Runtime-owned string (filesystem-loaded).
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Quick heuristic used by loaders to pick `Parameterized` over `Literal`.
    pub fn contains_placeholder(&self) -> bool {
        let s = self.as_str();
        s.find("{{").is_some_and(|open| s[open..].contains("}}"))
    }
}

/// Identifier of embedded content, e.g. `license:MIT` or `cli:{{CLI_FRAMEWORK}}`.
///
/// May contain placeholders; the renderer substitutes them before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentTemplateId(pub String);

impl ContentTemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
