//! Built-in templates and template discovery.
//!
//! The `python-package` template and the content library it references
//! (license texts, CLI modules, test modules) are compiled into the binary.
//! Templates on disk are discovered in this order, stopping at the first
//! directory that yields at least one valid template:
//!
//! 1. the configured templates directory (`--templates-dir` or
//!    `[templates] dir` in the config file)
//! 2. `$BAKERY_TEMPLATES_DIR`
//!
//! A discovered template with the same `name@version` as a built-in one
//! replaces it in the store.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use bakery_core::domain::{
    Condition, ContentTemplateId, DirectorySpec, DomainError, FileSpec, Template, TemplateBuilder,
    TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateSource,
};

use crate::template_loader::FilesystemTemplateLoader;

pub const TEMPLATES_DIR_ENV: &str = "BAKERY_TEMPLATES_DIR";

pub const PYTHON_PACKAGE: &str = "python-package";
pub const PYTHON_PACKAGE_VERSION: &str = "1.0.0";

// ── Embedded sources ─────────────────────────────────────────────────────────

macro_rules! package_file {
    ($path:literal) => {
        ($path, include_str!(concat!("../templates/python-package/", $path)))
    };
}

const PACKAGE_DIRECTORIES: &[&str] = &["docs", "src", "src/{{PROJECT_SLUG}}", "tests"];

const PACKAGE_FILES: &[(&str, &str)] = &[
    package_file!(".gitignore"),
    package_file!("CONTRIBUTING.md"),
    package_file!("HISTORY.md"),
    package_file!("README.md"),
    package_file!("mkdocs.yml"),
    package_file!("pyproject.toml"),
    package_file!("tasks.py"),
    package_file!("tox.ini"),
    package_file!("docs/index.md"),
    package_file!("docs/installation.md"),
    package_file!("docs/usage.md"),
    package_file!("docs/contributing.md"),
    package_file!("docs/history.md"),
    package_file!("src/{{PROJECT_SLUG}}/__init__.py"),
    package_file!("src/{{PROJECT_SLUG}}/{{PROJECT_SLUG}}.py"),
    package_file!("tests/__init__.py"),
];

const AUTHORS_FILES: &[(&str, &str)] = &[
    package_file!("AUTHORS.md"),
    package_file!("docs/authors.md"),
];

/// Content referenced by `external` template files, keyed by id.
const CONTENT_LIBRARY: &[(&str, &str)] = &[
    ("license:MIT", include_str!("../templates/content/license/MIT")),
    (
        "license:BSD-3-Clause",
        include_str!("../templates/content/license/BSD-3-Clause"),
    ),
    ("license:ISC", include_str!("../templates/content/license/ISC")),
    (
        "license:Apache-2.0",
        include_str!("../templates/content/license/Apache-2.0"),
    ),
    (
        "license:GPL-3.0-only",
        include_str!("../templates/content/license/GPL-3.0-only"),
    ),
    ("cli:click", include_str!("../templates/content/cli/click.py")),
    ("cli:typer", include_str!("../templates/content/cli/typer.py")),
    (
        "cli:argparse",
        include_str!("../templates/content/cli/argparse.py"),
    ),
    (
        "tests:pytest",
        include_str!("../templates/content/tests/pytest.py"),
    ),
    (
        "tests:unittest",
        include_str!("../templates/content/tests/unittest.py"),
    ),
];

/// Look up embedded content by its resolved id, e.g. `license:MIT`.
pub fn embedded_content(id: &str) -> Option<&'static str> {
    CONTENT_LIBRARY
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, body)| *body)
}

// ── Built-in templates ───────────────────────────────────────────────────────

/// The canonical Python package template.
pub fn python_package() -> Result<Template, DomainError> {
    let mut builder = TemplateBuilder::default()
        .id(TemplateId::new(PYTHON_PACKAGE, PYTHON_PACKAGE_VERSION))
        .metadata(
            TemplateMetadata::new("Python package")
                .description("Poetry-based Python package with docs, tests and tasks.")
                .author("Bakery")
                .tags(vec!["python".into(), "poetry".into(), "mkdocs".into()]),
        );

    for dir in PACKAGE_DIRECTORIES {
        builder = builder.add_node(TemplateNode::Directory(DirectorySpec::new(*dir)));
    }

    for (path, source) in PACKAGE_FILES {
        builder = builder.add_node(TemplateNode::File(FileSpec::new(
            *path,
            source_content(*source),
        )));
    }

    for (path, source) in AUTHORS_FILES {
        builder = builder.add_node(TemplateNode::File(
            FileSpec::new(*path, source_content(*source)).when(Condition::AuthorsFile),
        ));
    }

    let template = builder
        .add_node(TemplateNode::File(
            FileSpec::new("LICENSE", external("license:{{LICENSE}}")).when(Condition::LicenseFile),
        ))
        .add_node(TemplateNode::File(
            FileSpec::new("src/{{PROJECT_SLUG}}/cli.py", external("cli:{{CLI_FRAMEWORK}}"))
                .when(Condition::CliModule),
        ))
        .add_node(TemplateNode::File(FileSpec::new(
            "tests/test_{{PROJECT_SLUG}}.py",
            external("tests:{{TEST_FRAMEWORK}}"),
        )))
        .build()?;

    template.validate()?;
    Ok(template)
}

fn source_content(source: &'static str) -> TemplateContent {
    let source = TemplateSource::Static(source);
    if source.contains_placeholder() {
        TemplateContent::Parameterized(source)
    } else {
        TemplateContent::Literal(source)
    }
}

fn external(id: &str) -> TemplateContent {
    TemplateContent::External(ContentTemplateId::new(id))
}

/// Every template compiled into the binary.
pub fn builtin() -> Result<Vec<Template>, DomainError> {
    Ok(vec![python_package()?])
}

// ── Discovery ────────────────────────────────────────────────────────────────

/// Built-in templates followed by discovered ones.
#[instrument]
pub fn all_templates(configured: Option<&Path>) -> Result<Vec<Template>, DomainError> {
    let mut templates = builtin()?;
    templates.extend(discover(configured)?);
    Ok(templates)
}

/// Load templates from the first candidate directory that has any.
///
/// A candidate that exists but cannot be read is an error; broken templates
/// inside a readable directory are skipped by the loader.
pub fn discover(configured: Option<&Path>) -> Result<Vec<Template>, DomainError> {
    for candidate in candidate_paths(configured) {
        debug!(path = %candidate.display(), "checking candidate templates path");

        if !candidate.is_dir() {
            warn!(path = %candidate.display(), "templates directory does not exist, skipping");
            continue;
        }

        let templates = FilesystemTemplateLoader::new(&candidate).load_all()?;
        if templates.is_empty() {
            debug!(path = %candidate.display(), "no templates found, trying next");
            continue;
        }

        info!(
            path  = %candidate.display(),
            count = templates.len(),
            "templates loaded"
        );
        return Ok(templates);
    }

    Ok(Vec::new())
}

fn candidate_paths(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    if let Some(dir) = configured {
        paths.push(dir.to_path_buf());
    }

    if let Some(env_dir) = std::env::var_os(TEMPLATES_DIR_ENV) {
        let p = PathBuf::from(env_dir);
        debug!(path = %p.display(), "candidate from $BAKERY_TEMPLATES_DIR");
        paths.push(p);
    }

    paths
}
