//! Filesystem-based template loader.
//!
//! Discovers and parses `template.toml` manifests from a directory tree,
//! converting them into domain [`Template`] objects.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! └── django-app/
//!     ├── template.toml        ← manifest (required)
//!     ├── README.md
//!     └── src/
//!         └── {{PROJECT_SLUG}}/
//!             └── __init__.py
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "django-app"
//! version = "1.0.0"
//!
//! [metadata]
//! name        = "Django app"
//! description = "A reusable Django application."   # optional
//! author      = "Bakery"                            # optional
//! tags        = ["python", "django"]                # optional
//!
//! # Optional per-file settings. Files not listed are auto-detected:
//! # content containing {{ }} is parameterized, everything else literal.
//! [[files]]
//! path        = "LICENSE"
//! type        = "external"             # literal | parameterized | external
//! external_id = "license:{{LICENSE}}"  # required when type = "external"
//! when        = "license-file"         # license-file | cli-module | authors-file
//!
//! [[files]]
//! path       = "scripts/bootstrap.sh"
//! executable = true                     # optional, default false
//! ```

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use bakery_core::domain::{
    Condition, ContentTemplateId, DirectorySpec, DomainError, FileSpec, RelativePath, Template,
    TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateSource,
    TemplateTree,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    /// Per-file overrides. Files not listed here are auto-detected.
    pub files: Option<Vec<FileEntry>>,
    /// Directories that must exist even if they contain no tracked files.
    pub directories: Option<Vec<DirectoryEntry>>,
}

/// `[template]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[metadata]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    /// Display name shown in `bakery list`.
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    /// Content handling; auto-detected when omitted.
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    /// Required when `type = "external"`.
    pub external_id: Option<String>,
    /// Inclusion condition; the file is always generated when omitted.
    pub when: Option<Condition>,
    /// Mark the generated file executable.
    #[serde(default)]
    pub executable: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Literal,
    Parameterized,
    External,
}

/// One entry under `[[directories]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
    pub when: Option<Condition>,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`Template`] objects from a directory of template directories.
///
/// Subdirectories without a valid `template.toml` emit a `WARN` and are
/// skipped; they do not prevent other templates from loading.
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every valid template found under the templates directory.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidTemplate`] if the directory is missing or
    /// unreadable. Broken template subdirectories are skipped, not fatal.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Template>, DomainError> {
        if !self.templates_dir.is_dir() {
            return Err(DomainError::InvalidTemplate(format!(
                "templates directory not found: {}",
                self.templates_dir.display()
            )));
        }

        let read_dir = fs::read_dir(&self.templates_dir).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to read templates directory '{}': {e}",
                self.templates_dir.display()
            ))
        })?;

        let mut templates = Vec::new();

        for entry_result in read_dir {
            let entry = entry_result.map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read directory entry: {e}"))
            })?;

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            match self.load_template_from_dir(&path) {
                Ok(template) => {
                    debug!(id = %template.id, "loaded template");
                    templates.push(template);
                }
                Err(e) => {
                    warn!(
                        dir   = %path.display(),
                        error = %e,
                        "skipping template directory due to load error"
                    );
                }
            }
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn load_template_from_dir(&self, dir: &Path) -> Result<Template, DomainError> {
        let manifest_path = dir.join("template.toml");
        if !manifest_path.exists() {
            return Err(DomainError::InvalidTemplate(format!(
                "missing template.toml in '{}'",
                dir.display()
            )));
        }

        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to read '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let manifest: TemplateManifest = toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to parse '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let id = TemplateId::parse(&format!(
            "{}@{}",
            manifest.template.id, manifest.template.version
        ))?;
        let tree = build_tree_from_dir(dir, &manifest)?;

        let metadata = TemplateMetadata::new(manifest.metadata.name)
            .description(manifest.metadata.description.unwrap_or_default())
            .author(manifest.metadata.author.unwrap_or_else(|| "Bakery".into()))
            .tags(manifest.metadata.tags.unwrap_or_default());

        let template = TemplateBuilder::default()
            .id(id)
            .metadata(metadata)
            .tree(tree)
            .build()?;
        template.validate()?;
        Ok(template)
    }
}

/// Walk `dir` and build a [`TemplateTree`] according to the manifest.
///
/// 1. `[[directories]]` entries (kept even if empty on disk)
/// 2. every file and directory found on disk
/// 3. external-only `[[files]]` entries with no disk representation
fn build_tree_from_dir(dir: &Path, manifest: &TemplateManifest) -> Result<TemplateTree, DomainError> {
    let mut tree = TemplateTree::new();
    let mut added_paths: HashSet<String> = HashSet::new();

    if let Some(dirs) = &manifest.directories {
        for entry in dirs {
            let path = normalize_path(&entry.path);
            if added_paths.insert(path.clone()) {
                let mut spec = DirectorySpec::new(RelativePath::try_new(path)?);
                spec.condition = entry.when;
                tree.push(TemplateNode::Directory(spec));
            }
        }
    }

    let manifest_files: HashMap<String, &FileEntry> = manifest
        .files
        .as_ref()
        .map(|files| files.iter().map(|f| (normalize_path(&f.path), f)).collect())
        .unwrap_or_default();

    for walk_entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let walk_entry = walk_entry
            .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
        let abs_path = walk_entry.path();
        let rel_raw = abs_path.strip_prefix(dir).map_err(|_| {
            DomainError::InvalidTemplate(format!(
                "failed to relativise '{}' against '{}'",
                abs_path.display(),
                dir.display()
            ))
        })?;

        if rel_raw.file_name() == Some(std::ffi::OsStr::new("template.toml")) {
            continue;
        }

        let path_str = normalize_path(&rel_raw.to_string_lossy());

        if walk_entry.file_type().is_dir() {
            if added_paths.insert(path_str.clone()) {
                tree.push(TemplateNode::Directory(DirectorySpec::new(
                    RelativePath::try_new(path_str)?,
                )));
            }
            continue;
        }

        if !walk_entry.file_type().is_file() {
            continue;
        }

        let content = fs::read_to_string(abs_path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read file '{path_str}': {e}"))
        })?;

        let manifest_entry = manifest_files.get(&path_str).copied();
        let template_content = resolve_file_content(&path_str, content, manifest_entry)?;

        if added_paths.insert(path_str.clone()) {
            let spec = FileSpec::new(RelativePath::try_new(path_str)?, template_content);
            tree.push(TemplateNode::File(apply_entry(spec, manifest_entry)));
        }
    }

    if let Some(file_entries) = &manifest.files {
        for entry in file_entries
            .iter()
            .filter(|e| e.file_type == Some(FileType::External))
        {
            let path_str = normalize_path(&entry.path);
            if added_paths.contains(&path_str) {
                continue;
            }
            let spec = FileSpec::new(
                RelativePath::try_new(path_str.clone())?,
                TemplateContent::External(external_id(&path_str, entry)?),
            );
            tree.push(TemplateNode::File(apply_entry(spec, Some(entry))));
            added_paths.insert(path_str);
        }
    }

    Ok(tree)
}

/// Copy the `when` and `executable` settings of a `[[files]]` entry.
fn apply_entry(mut spec: FileSpec, entry: Option<&FileEntry>) -> FileSpec {
    let Some(entry) = entry else {
        return spec;
    };
    spec.condition = entry.when;
    if entry.executable {
        spec = spec.executable();
    }
    spec
}

/// Explicit manifest `type` wins; otherwise `{{ … }}` marks a file parameterized.
fn resolve_file_content(
    path_str: &str,
    content: String,
    manifest_entry: Option<&FileEntry>,
) -> Result<TemplateContent, DomainError> {
    let source = TemplateSource::from(content);
    let file_type = manifest_entry.and_then(|e| e.file_type).unwrap_or_else(|| {
        if source.contains_placeholder() {
            FileType::Parameterized
        } else {
            FileType::Literal
        }
    });

    match (file_type, manifest_entry) {
        (FileType::Literal, _) => Ok(TemplateContent::Literal(source)),
        (FileType::Parameterized, _) => Ok(TemplateContent::Parameterized(source)),
        (FileType::External, Some(entry)) => {
            Ok(TemplateContent::External(external_id(path_str, entry)?))
        }
        (FileType::External, None) => Err(DomainError::InvalidTemplate(format!(
            "external file '{path_str}' has no manifest entry"
        ))),
    }
}

fn external_id(path_str: &str, entry: &FileEntry) -> Result<ContentTemplateId, DomainError> {
    entry
        .external_id
        .as_deref()
        .map(ContentTemplateId::new)
        .ok_or_else(|| {
            DomainError::InvalidTemplate(format!(
                "external file '{path_str}' is missing required external_id"
            ))
        })
}

/// Normalise to forward slashes so Windows and Unix paths compare identically.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
