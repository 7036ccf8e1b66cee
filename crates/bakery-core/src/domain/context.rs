//! The scaffolding Context: one value per option, fixed for one invocation.
//!
//! A [`Context`] can only be obtained through [`ContextBuilder::build`], which
//! fills in defaults, derives the project slug and validates it. After that the
//! value is immutable and everything downstream is a pure function of it.
//!
//! The calendar year is a plain field. Callers read the clock once and pass
//! it to [`ContextBuilder::new`].

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    error::DomainError,
    value_objects::{CliFramework, Formatter, License, TestFramework, keys, parse_bool},
};

/// Default option values.
pub mod defaults {
    pub const FULL_NAME: &str = "Audrey Roy Greenfeld";
    pub const EMAIL: &str = "audreyr@example.com";
    pub const GITHUB_USERNAME: &str = "audreyr";
    pub const PROJECT_NAME: &str = "Python Boilerplate";
    pub const PROJECT_SHORT_DESCRIPTION: &str =
        "Python Boilerplate contains all the boilerplate you need to create a Python package.";
    pub const VERSION: &str = "0.1.0";
    pub const LICENSE: super::License = super::License::Mit;
    pub const CLI: super::CliFramework = super::CliFramework::Click;
    pub const USE_PYTEST: bool = false;
    pub const FORMATTER: super::Formatter = super::Formatter::Black;
    pub const CREATE_AUTHOR_FILE: bool = true;
}

/// Resolved scaffolding options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    full_name: String,
    email: String,
    github_username: String,
    project_name: String,
    project_slug: String,
    project_short_description: String,
    version: String,
    license: License,
    cli: CliFramework,
    test_framework: TestFramework,
    formatter: Formatter,
    create_author_file: bool,
    year: i32,
}

impl Context {
    pub fn builder(year: i32) -> ContextBuilder {
        ContextBuilder::new(year)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn github_username(&self) -> &str {
        &self.github_username
    }
    pub fn project_name(&self) -> &str {
        &self.project_name
    }
    pub fn project_slug(&self) -> &str {
        &self.project_slug
    }
    pub fn project_short_description(&self) -> &str {
        &self.project_short_description
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn license(&self) -> License {
        self.license
    }
    pub fn cli(&self) -> CliFramework {
        self.cli
    }
    pub fn test_framework(&self) -> TestFramework {
        self.test_framework
    }
    pub fn use_pytest(&self) -> bool {
        self.test_framework == TestFramework::Pytest
    }
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }
    pub fn create_author_file(&self) -> bool {
        self.create_author_file
    }
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Every option as `(key, display value)`, in [`keys::ALL`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let yn = |b: bool| if b { "y" } else { "n" }.to_string();
        vec![
            (keys::FULL_NAME, self.full_name.clone()),
            (keys::EMAIL, self.email.clone()),
            (keys::GITHUB_USERNAME, self.github_username.clone()),
            (keys::PROJECT_NAME, self.project_name.clone()),
            (keys::PROJECT_SLUG, self.project_slug.clone()),
            (
                keys::PROJECT_SHORT_DESCRIPTION,
                self.project_short_description.clone(),
            ),
            (keys::VERSION, self.version.clone()),
            (keys::LICENSE, self.license.to_string()),
            (keys::CLI, self.cli.to_string()),
            (keys::USE_PYTEST, yn(self.use_pytest())),
            (keys::FORMATTER, self.formatter.to_string()),
            (keys::CREATE_AUTHOR_FILE, yn(self.create_author_file)),
        ]
    }
}

/// Collects option values and produces a validated [`Context`].
///
/// Setters may be called in any order and repeatedly; the last call wins.
/// That gives the layering used by the CLI: built-in defaults, then
/// configuration-file defaults, then operator overrides.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    year: i32,
    full_name: Option<String>,
    email: Option<String>,
    github_username: Option<String>,
    project_name: Option<String>,
    project_slug: Option<String>,
    project_short_description: Option<String>,
    version: Option<String>,
    license: Option<License>,
    cli: Option<CliFramework>,
    use_pytest: Option<bool>,
    formatter: Option<Formatter>,
    create_author_file: Option<bool>,
}

impl ContextBuilder {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn full_name(mut self, v: impl Into<String>) -> Self {
        self.full_name = Some(v.into());
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.email = Some(v.into());
        self
    }

    pub fn github_username(mut self, v: impl Into<String>) -> Self {
        self.github_username = Some(v.into());
        self
    }

    pub fn project_name(mut self, v: impl Into<String>) -> Self {
        self.project_name = Some(v.into());
        self
    }

    /// Explicit slug; when unset it is derived from the project name.
    pub fn project_slug(mut self, v: impl Into<String>) -> Self {
        self.project_slug = Some(v.into());
        self
    }

    pub fn project_short_description(mut self, v: impl Into<String>) -> Self {
        self.project_short_description = Some(v.into());
        self
    }

    pub fn version(mut self, v: impl Into<String>) -> Self {
        self.version = Some(v.into());
        self
    }

    pub fn license(mut self, v: License) -> Self {
        self.license = Some(v);
        self
    }

    pub fn cli(mut self, v: CliFramework) -> Self {
        self.cli = Some(v);
        self
    }

    pub fn use_pytest(mut self, v: bool) -> Self {
        self.use_pytest = Some(v);
        self
    }

    pub fn formatter(mut self, v: Formatter) -> Self {
        self.formatter = Some(v);
        self
    }

    pub fn create_author_file(mut self, v: bool) -> Self {
        self.create_author_file = Some(v);
        self
    }

    /// Set an option from its textual key and value.
    ///
    /// # Errors
    ///
    /// - `UnknownOption` if `key` is not one of [`keys::ALL`]
    /// - `InvalidOption` if `value` is outside the option's domain
    pub fn set(self, key: &str, value: &str) -> Result<Self, DomainError> {
        debug!(key, value, "setting context option");
        let builder = match key.trim() {
            keys::FULL_NAME => self.full_name(value),
            keys::EMAIL => self.email(value),
            keys::GITHUB_USERNAME => self.github_username(value),
            keys::PROJECT_NAME => self.project_name(value),
            keys::PROJECT_SLUG => self.project_slug(value),
            keys::PROJECT_SHORT_DESCRIPTION => self.project_short_description(value),
            keys::VERSION => self.version(value),
            keys::LICENSE => self.license(value.parse()?),
            keys::CLI => self.cli(value.parse()?),
            keys::USE_PYTEST => self.use_pytest(parse_bool(keys::USE_PYTEST, value)?),
            keys::FORMATTER => self.formatter(value.parse()?),
            keys::CREATE_AUTHOR_FILE => {
                self.create_author_file(parse_bool(keys::CREATE_AUTHOR_FILE, value)?)
            }
            other => {
                return Err(DomainError::UnknownOption {
                    option: other.to_string(),
                    known: keys::ALL.iter().map(|k| k.to_string()).collect(),
                });
            }
        };
        Ok(builder)
    }

    /// Apply defaults, derive the slug, validate.
    ///
    /// # Errors
    ///
    /// - `InvalidOption` for an empty project name or version, or a GitHub
    ///   username that cannot appear in a repository URL
    /// - `InvalidProjectSlug` if the slug is not a Python module name
    pub fn build(self) -> Result<Context, DomainError> {
        let project_name = self
            .project_name
            .unwrap_or_else(|| defaults::PROJECT_NAME.to_string());
        if project_name.trim().is_empty() {
            return Err(DomainError::InvalidOption {
                option: keys::PROJECT_NAME.to_string(),
                value: project_name,
                allowed: vec!["any non-empty text".to_string()],
            });
        }

        let version = self
            .version
            .unwrap_or_else(|| defaults::VERSION.to_string());
        if version.trim().is_empty() {
            return Err(DomainError::InvalidOption {
                option: keys::VERSION.to_string(),
                value: version,
                allowed: vec!["any non-empty text".to_string()],
            });
        }

        let project_slug = self
            .project_slug
            .unwrap_or_else(|| derive_slug(&project_name));
        validate_slug(&project_slug)?;

        let github_username = self
            .github_username
            .unwrap_or_else(|| defaults::GITHUB_USERNAME.to_string());
        validate_github_username(&github_username)?;

        Ok(Context {
            full_name: self
                .full_name
                .unwrap_or_else(|| defaults::FULL_NAME.to_string()),
            email: self.email.unwrap_or_else(|| defaults::EMAIL.to_string()),
            github_username,
            project_name,
            project_slug,
            project_short_description: self
                .project_short_description
                .unwrap_or_else(|| defaults::PROJECT_SHORT_DESCRIPTION.to_string()),
            version,
            license: self.license.unwrap_or(defaults::LICENSE),
            cli: self.cli.unwrap_or(defaults::CLI),
            test_framework: TestFramework::from_use_pytest(
                self.use_pytest.unwrap_or(defaults::USE_PYTEST),
            ),
            formatter: self.formatter.unwrap_or(defaults::FORMATTER),
            create_author_file: self
                .create_author_file
                .unwrap_or(defaults::CREATE_AUTHOR_FILE),
            year: self.year,
        })
    }
}

/// `Python Boilerplate` -> `python_boilerplate`; `my-pkg` -> `my_pkg`.
pub fn derive_slug(project_name: &str) -> String {
    project_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// `^[_a-zA-Z][_a-zA-Z0-9]+$`
fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectSlug {
        slug: slug.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = slug.chars();
    match chars.next() {
        None => return Err(invalid("slug is empty")),
        Some(c) if !(c == '_' || c.is_ascii_alphabetic()) => {
            return Err(invalid("must start with a letter or '_'"));
        }
        Some(_) => {}
    }

    let rest = chars.as_str();
    if rest.is_empty() {
        return Err(invalid("must be at least two characters long"));
    }
    if let Some(bad) = rest.chars().find(|c| !(*c == '_' || c.is_ascii_alphanumeric())) {
        return Err(invalid(&format!("character '{bad}' is not allowed")));
    }

    Ok(())
}

/// GitHub logins: up to 39 ASCII alphanumerics or single hyphens, no hyphen
/// at either end.
fn validate_github_username(name: &str) -> Result<(), DomainError> {
    let valid = (1..=39).contains(&name.len())
        && name.chars().all(|c| c == '-' || c.is_ascii_alphanumeric())
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--");
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidOption {
            option: keys::GITHUB_USERNAME.to_string(),
            value: name.to_string(),
            allowed: vec![
                "1 to 39 letters, digits or single hyphens, not at either end".to_string(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let ctx = ContextBuilder::new(2026).build().unwrap();

        assert_eq!(ctx.project_name(), "Python Boilerplate");
        assert_eq!(ctx.project_slug(), "python_boilerplate");
        assert_eq!(ctx.license(), License::Mit);
        assert_eq!(ctx.cli(), CliFramework::Click);
        assert_eq!(ctx.test_framework(), TestFramework::Unittest);
        assert_eq!(ctx.formatter(), Formatter::Black);
        assert!(ctx.create_author_file());
        assert_eq!(ctx.year(), 2026);
    }

    #[test]
    fn slug_is_derived_from_project_name() {
        let ctx = ContextBuilder::new(2026)
            .project_name("My Cool-Package")
            .build()
            .unwrap();
        assert_eq!(ctx.project_slug(), "my_cool_package");
    }

    #[test]
    fn explicit_slug_wins() {
        let ctx = ContextBuilder::new(2026)
            .project_name("Whatever")
            .project_slug("_internal2")
            .build()
            .unwrap();
        assert_eq!(ctx.project_slug(), "_internal2");
    }

    #[test]
    fn invalid_slugs_are_rejected() {
        for slug in ["1abc", "a", "has.dot", "ünï", ""] {
            let result = ContextBuilder::new(2026).project_slug(slug).build();
            assert!(
                matches!(result, Err(DomainError::InvalidProjectSlug { .. })),
                "slug {slug:?} should be rejected"
            );
        }
    }

    #[test]
    fn set_parses_enumerated_options() {
        let ctx = ContextBuilder::new(2026)
            .set("open_source_license", "Not open source")
            .unwrap()
            .set("command_line_interface", "Typer")
            .unwrap()
            .set("use_pytest", "y")
            .unwrap()
            .set("formatter", "Ruff-format")
            .unwrap()
            .set("create_author_file", "n")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(ctx.license(), License::NotOpenSource);
        assert_eq!(ctx.cli(), CliFramework::Typer);
        assert!(ctx.use_pytest());
        assert_eq!(ctx.formatter(), Formatter::RuffFormat);
        assert!(!ctx.create_author_file());
    }

    #[test]
    fn set_rejects_values_outside_domain() {
        let err = ContextBuilder::new(2026)
            .set("formatter", "yapf")
            .unwrap_err();
        match err {
            DomainError::InvalidOption { option, value, .. } => {
                assert_eq!(option, "formatter");
                assert_eq!(value, "yapf");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let err = ContextBuilder::new(2026).set("use_tox", "y").unwrap_err();
        assert!(matches!(err, DomainError::UnknownOption { .. }));
    }

    #[test]
    fn later_values_override_earlier_ones() {
        let ctx = ContextBuilder::new(2026)
            .set("full_name", "Config Default")
            .unwrap()
            .full_name("Cli Override")
            .build()
            .unwrap();
        assert_eq!(ctx.full_name(), "Cli Override");
    }

    #[test]
    fn github_username_must_fit_a_repository_url() {
        let longest = "x".repeat(39);
        let too_long = "x".repeat(40);

        for name in ["audreyr", "a", "my-org-2", longest.as_str()] {
            let ctx = ContextBuilder::new(2026).github_username(name).build().unwrap();
            assert_eq!(ctx.github_username(), name);
        }

        for name in ["", "-lead", "trail-", "dou--ble", "has space", "q\"uote", too_long.as_str()] {
            let err = ContextBuilder::new(2026)
                .github_username(name)
                .build()
                .unwrap_err();
            assert!(
                matches!(&err, DomainError::InvalidOption { option, .. } if option == "github_username"),
                "{name:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn empty_project_name_is_rejected() {
        let result = ContextBuilder::new(2026).project_name("   ").build();
        assert!(matches!(result, Err(DomainError::InvalidOption { .. })));
    }

    #[test]
    fn entries_cover_every_key() {
        let ctx = ContextBuilder::new(2026).build().unwrap();
        let listed: Vec<_> = ctx.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(listed, keys::ALL);
    }
}
