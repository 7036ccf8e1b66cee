//! Rule table: Context in, render context out.
//!
//! Three tables drive everything optional about a generated project:
//!
//! - [`Condition`]: whole-file inclusion (LICENSE, `cli.py`, AUTHORS.md, ...).
//!   Template nodes carry an optional condition; the renderer drops nodes
//!   whose condition does not hold.
//! - [`FRAGMENT_RULES`]: named slots inside included files (`{{README_LICENSE}}`,
//!   `{{SCRIPTS_SECTION}}`, ...). Each rule renders its slot from the Context
//!   alone; no rule reads another rule's output.
//! - [`standard_variables`]: plain option values and their quoted forms.
//!
//! Line-shaped fragments carry their own trailing newline, so an empty
//! fragment leaves no blank line behind.
//!
//! # Adding a Rule
//!
//! 1. Add one [`FragmentRule`] entry (or a [`Condition`] variant)
//! 2. Reference the slot from the template file
//! 3. The renderer and services need no change

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    context::Context,
    entities::template::{RenderContext, to_pascal_case},
    error::DomainError,
    value_objects::{CliFramework, Formatter, TestFramework},
};

// ── Inclusion conditions ─────────────────────────────────────────────────────

/// Predicate deciding whether an optional file is part of the output tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// License is open source: `LICENSE` is generated.
    LicenseFile,
    /// A CLI framework is chosen: `src/<slug>/cli.py` is generated.
    CliModule,
    /// Authors file requested: `AUTHORS.md` and `docs/authors.md`.
    AuthorsFile,
}

impl Condition {
    pub const ALL: &'static [Condition] = &[Self::LicenseFile, Self::CliModule, Self::AuthorsFile];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LicenseFile => "license-file",
            Self::CliModule => "cli-module",
            Self::AuthorsFile => "authors-file",
        }
    }

    pub fn holds(&self, ctx: &Context) -> bool {
        match self {
            Self::LicenseFile => ctx.license().is_open_source(),
            Self::CliModule => ctx.cli().is_enabled(),
            Self::AuthorsFile => ctx.create_author_file(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidOption {
                option: "when".to_string(),
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// ── Fragment rules ───────────────────────────────────────────────────────────

/// One conditional text block and the slot it fills.
#[derive(Clone, Copy)]
pub struct FragmentRule {
    /// Placeholder name, referenced as `{{SLOT}}` in template files.
    pub slot: &'static str,
    /// Renders the slot; returns an empty string when the block is absent.
    pub render: fn(&Context) -> String,
}

impl fmt::Debug for FragmentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentRule")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

pub static FRAGMENT_RULES: &[FragmentRule] = &[
    // ── License ──────────────────────────────────────────────────────────────
    FragmentRule {
        slot: "README_LICENSE",
        render: |ctx| {
            if ctx.license().is_open_source() {
                format!("* Free software: {}\n", ctx.license())
            } else {
                String::new()
            }
        },
    },
    FragmentRule {
        slot: "PYPROJECT_LICENSE",
        render: |ctx| {
            if ctx.license().is_open_source() {
                format!("license = \"{}\"\n", ctx.license())
            } else {
                String::new()
            }
        },
    },
    // ── Command-line interface ───────────────────────────────────────────────
    FragmentRule {
        slot: "CLI_DEPENDENCY",
        render: |ctx| match ctx.cli() {
            CliFramework::Click => "click = \"^8.1\"\n".to_string(),
            CliFramework::Typer => "typer = \"^0.12\"\n".to_string(),
            CliFramework::Argparse | CliFramework::None => String::new(),
        },
    },
    FragmentRule {
        slot: "SCRIPTS_SECTION",
        render: |ctx| {
            let entry = match ctx.cli() {
                CliFramework::None => return String::new(),
                CliFramework::Typer => "app",
                CliFramework::Click | CliFramework::Argparse => "main",
            };
            let slug = ctx.project_slug();
            format!("\n[tool.poetry.scripts]\n{slug} = \"{slug}.cli:{entry}\"\n")
        },
    },
    FragmentRule {
        slot: "USAGE_CLI",
        render: |ctx| {
            if ctx.cli().is_enabled() {
                format!(
                    "\nTo use it from the command line:\n\n```console\n$ {} --help\n```\n",
                    ctx.project_slug()
                )
            } else {
                String::new()
            }
        },
    },
    // ── Test framework ───────────────────────────────────────────────────────
    FragmentRule {
        slot: "TEST_DEPENDENCY",
        render: |ctx| match ctx.test_framework() {
            TestFramework::Pytest => "pytest = \"^8.0\"\n".to_string(),
            TestFramework::Unittest => String::new(),
        },
    },
    FragmentRule {
        slot: "TEST_COMMAND",
        render: |ctx| match ctx.test_framework() {
            TestFramework::Pytest => "pytest".to_string(),
            TestFramework::Unittest => "python -m unittest discover".to_string(),
        },
    },
    FragmentRule {
        slot: "TOX_TEST",
        render: |ctx| match ctx.test_framework() {
            TestFramework::Pytest => {
                "deps =\n    pytest\ncommands = pytest --basetemp={envtmpdir}\n".to_string()
            }
            TestFramework::Unittest => "commands = python -m unittest discover\n".to_string(),
        },
    },
    FragmentRule {
        slot: "CLI_TEST_IMPORT",
        render: |ctx| match ctx.cli() {
            CliFramework::Click => "from click.testing import CliRunner\n".to_string(),
            CliFramework::Typer => "from typer.testing import CliRunner\n".to_string(),
            CliFramework::Argparse | CliFramework::None => String::new(),
        },
    },
    FragmentRule {
        slot: "CLI_MODULE_IMPORT",
        render: |ctx| match ctx.cli() {
            CliFramework::Click | CliFramework::Typer => {
                format!("from {} import cli\n", ctx.project_slug())
            }
            CliFramework::Argparse | CliFramework::None => String::new(),
        },
    },
    FragmentRule {
        slot: "CLI_TEST",
        render: cli_test,
    },
    // ── Formatter ────────────────────────────────────────────────────────────
    FragmentRule {
        slot: "FORMATTER_DEPENDENCY",
        render: |ctx| match ctx.formatter() {
            Formatter::Black => "black = \"^24.3\"\n".to_string(),
            Formatter::RuffFormat => "ruff = \"^0.6\"\n".to_string(),
            Formatter::None => String::new(),
        },
    },
    FragmentRule {
        slot: "FORMATTER_TASK",
        render: |ctx| {
            ctx.formatter()
                .check_command()
                .map(|cmd| format!("    c.run(\"{cmd}\")\n"))
                .unwrap_or_default()
        },
    },
    // ── Authors ──────────────────────────────────────────────────────────────
    FragmentRule {
        slot: "DOCS_NAV_AUTHORS",
        render: |ctx| {
            if ctx.create_author_file() {
                "  - Authors: authors.md\n".to_string()
            } else {
                String::new()
            }
        },
    },
    FragmentRule {
        slot: "DOCS_INDEX_AUTHORS",
        render: |ctx| {
            if ctx.create_author_file() {
                "- [Authors](authors.md)\n".to_string()
            } else {
                String::new()
            }
        },
    },
];

/// CLI test case in the chosen test style; only Click and Typer ship a runner.
fn cli_test(ctx: &Context) -> String {
    let target = match ctx.cli() {
        CliFramework::Click => "cli.main",
        CliFramework::Typer => "cli.app",
        CliFramework::Argparse | CliFramework::None => return String::new(),
    };
    let slug = ctx.project_slug();

    let body = [
        "\"\"\"Test the CLI.\"\"\"".to_string(),
        "runner = CliRunner()".to_string(),
        format!("result = runner.invoke({target})"),
        "assert result.exit_code == 0".to_string(),
        format!("assert \"{slug}.cli.main\" in result.output"),
        format!("help_result = runner.invoke({target}, [\"--help\"])"),
        "assert help_result.exit_code == 0".to_string(),
        "assert \"Show this message and exit.\" in help_result.output".to_string(),
    ];

    let (header, indent) = match ctx.test_framework() {
        TestFramework::Pytest => ("\n\ndef test_command_line_interface():\n", "    "),
        TestFramework::Unittest => ("\n    def test_command_line_interface(self):\n", "        "),
    };

    let mut out = header.to_string();
    for line in body {
        out.push_str(indent);
        out.push_str(&line);
        out.push('\n');
    }
    out
}

// ── Standard variables ───────────────────────────────────────────────────────

/// Option values as template variables.
///
/// `*_QUOTED` variants are complete string literals (quotes included), see
/// [`quoted`]. The same literal is embedded in `pyproject.toml`,
/// `__init__.py` and `mkdocs.yml`.
pub fn standard_variables(ctx: &Context) -> Vec<(&'static str, String)> {
    vec![
        ("FULL_NAME", ctx.full_name().to_string()),
        ("EMAIL", ctx.email().to_string()),
        ("GITHUB_USERNAME", ctx.github_username().to_string()),
        ("PROJECT_NAME", ctx.project_name().to_string()),
        ("PROJECT_SLUG", ctx.project_slug().to_string()),
        ("PROJECT_SLUG_PASCAL", to_pascal_case(ctx.project_slug())),
        (
            "PROJECT_SHORT_DESCRIPTION",
            ctx.project_short_description().to_string(),
        ),
        ("VERSION", ctx.version().to_string()),
        ("YEAR", ctx.year().to_string()),
        ("LICENSE", ctx.license().to_string()),
        ("CLI_FRAMEWORK", ctx.cli().slug().to_string()),
        ("TEST_FRAMEWORK", ctx.test_framework().to_string()),
        ("FORMATTER", ctx.formatter().to_string()),
        ("FULL_NAME_QUOTED", quoted(ctx.full_name())),
        ("EMAIL_QUOTED", quoted(ctx.email())),
        ("PROJECT_NAME_QUOTED", quoted(ctx.project_name())),
        ("DESCRIPTION_QUOTED", quoted(ctx.project_short_description())),
        ("VERSION_QUOTED", quoted(ctx.version())),
        (
            "AUTHOR_QUOTED",
            quoted(&format!("{} <{}>", ctx.full_name(), ctx.email())),
        ),
    ]
}

/// Single-line double-quoted literal.
///
/// Only `\\`, `\"`, `\n`, `\t`, `\r` and `\uXXXX` escapes are emitted; that
/// subset reads the same as a TOML basic string, a Python string and a YAML
/// double-quoted scalar. Line and paragraph separators are escaped as well
/// since YAML 1.1 parsers fold them.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Derive the render context for one Context: variables, fragments, conditions.
pub fn resolve(ctx: &Context) -> RenderContext {
    let mut out = RenderContext::new();

    for (key, value) in standard_variables(ctx) {
        out = out.with_variable(key, value);
    }

    for rule in FRAGMENT_RULES {
        out = out.with_variable(rule.slot, (rule.render)(ctx));
    }

    for condition in Condition::ALL {
        if condition.holds(ctx) {
            out = out.with_condition(*condition);
        }
    }

    out
}

impl From<&Context> for RenderContext {
    fn from(ctx: &Context) -> Self {
        resolve(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{context::ContextBuilder, value_objects::License};
    use std::collections::HashSet;

    fn base() -> ContextBuilder {
        ContextBuilder::new(2026)
    }

    fn slot(ctx: &Context, name: &str) -> String {
        resolve(ctx).get(name).unwrap_or_default().to_string()
    }

    #[test]
    fn fragment_slots_are_unique() {
        let mut seen = HashSet::new();
        for rule in FRAGMENT_RULES {
            assert!(seen.insert(rule.slot), "duplicate slot {}", rule.slot);
        }
        for (key, _) in standard_variables(&base().build().unwrap()) {
            assert!(!seen.contains(key), "slot {key} shadows a variable");
        }
    }

    #[test]
    fn line_fragments_end_with_newline_or_are_empty() {
        let ctx = base().use_pytest(true).build().unwrap();
        for rule in FRAGMENT_RULES {
            if rule.slot == "TEST_COMMAND" {
                continue;
            }
            let text = (rule.render)(&ctx);
            assert!(
                text.is_empty() || text.ends_with('\n'),
                "{} must end with a newline",
                rule.slot
            );
        }
    }

    #[test]
    fn open_source_license_fills_readme_and_pyproject() {
        for license in License::ALL.iter().filter(|l| l.is_open_source()) {
            let ctx = base().license(*license).build().unwrap();
            let rc = resolve(&ctx);
            assert!(rc.holds(Condition::LicenseFile));
            assert_eq!(
                rc.get("README_LICENSE"),
                Some(format!("* Free software: {license}\n").as_str())
            );
            assert_eq!(
                rc.get("PYPROJECT_LICENSE"),
                Some(format!("license = \"{license}\"\n").as_str())
            );
        }
    }

    #[test]
    fn closed_license_has_no_license_text() {
        let ctx = base().license(License::NotOpenSource).build().unwrap();
        let rc = resolve(&ctx);
        assert!(!rc.holds(Condition::LicenseFile));
        assert_eq!(rc.get("README_LICENSE"), Some(""));
        assert_eq!(rc.get("PYPROJECT_LICENSE"), Some(""));
    }

    #[test]
    fn no_cli_drops_module_scripts_and_dependency() {
        let ctx = base().cli(CliFramework::None).build().unwrap();
        let rc = resolve(&ctx);
        assert!(!rc.holds(Condition::CliModule));
        for name in ["SCRIPTS_SECTION", "CLI_DEPENDENCY", "CLI_TEST", "USAGE_CLI"] {
            assert_eq!(rc.get(name), Some(""), "{name} should be empty");
        }
    }

    #[test]
    fn scripts_entry_point_per_framework() {
        let entry = |cli| slot(&base().cli(cli).build().unwrap(), "SCRIPTS_SECTION");
        assert!(entry(CliFramework::Click).contains("python_boilerplate.cli:main"));
        assert!(entry(CliFramework::Argparse).contains("python_boilerplate.cli:main"));
        assert!(entry(CliFramework::Typer).contains("python_boilerplate.cli:app"));
        assert!(entry(CliFramework::Click).starts_with("\n[tool.poetry.scripts]\n"));
    }

    #[test]
    fn argparse_needs_no_dependency() {
        let ctx = base().cli(CliFramework::Argparse).build().unwrap();
        assert_eq!(slot(&ctx, "CLI_DEPENDENCY"), "");
        assert!(resolve(&ctx).holds(Condition::CliModule));
    }

    #[test]
    fn formatter_dependency_and_task_come_together() {
        for formatter in Formatter::ALL {
            let ctx = base().formatter(*formatter).build().unwrap();
            let dep = slot(&ctx, "FORMATTER_DEPENDENCY");
            let task = slot(&ctx, "FORMATTER_TASK");
            assert_eq!(dep.is_empty(), task.is_empty(), "{formatter}");
            match formatter {
                Formatter::Black => {
                    assert!(dep.starts_with("black = "));
                    assert!(task.contains("black --check"));
                }
                Formatter::RuffFormat => {
                    assert!(dep.starts_with("ruff = "));
                    assert!(task.contains("ruff format --check"));
                }
                Formatter::None => assert!(dep.is_empty()),
            }
        }
    }

    #[test]
    fn cli_test_follows_test_style() {
        let pytest = base().use_pytest(true).build().unwrap();
        let unittest = base().build().unwrap();

        let p = slot(&pytest, "CLI_TEST");
        let u = slot(&unittest, "CLI_TEST");
        assert!(p.contains("\ndef test_command_line_interface():"));
        assert!(u.contains("    def test_command_line_interface(self):"));
        assert!(p.contains("python_boilerplate.cli.main"));
        assert!(u.contains("runner.invoke(cli.main)"));
    }

    #[test]
    fn authors_fragments_follow_flag() {
        let without = base().create_author_file(false).build().unwrap();
        let rc = resolve(&without);
        assert!(!rc.holds(Condition::AuthorsFile));
        assert_eq!(rc.get("DOCS_NAV_AUTHORS"), Some(""));
        assert_eq!(rc.get("DOCS_INDEX_AUTHORS"), Some(""));

        let with = resolve(&base().build().unwrap());
        assert!(with.holds(Condition::AuthorsFile));
        assert!(with.get("DOCS_NAV_AUTHORS").unwrap().contains("authors.md"));
    }

    #[test]
    fn quoted_values_stay_on_one_double_quoted_line() {
        let cases = [
            ("Audrey", r#""Audrey""#),
            (r#"O'Brien "Bob""#, r#""O'Brien \"Bob\"""#),
            ("back\\slash", r#""back\\slash""#),
            ("line1\nline2\tx\r", r#""line1\nline2\tx\r""#),
            ("bell\u{7}del\u{7f}", r#""bell\u0007del\u007F""#),
            ("a\u{2028}b", r#""a\u2028b""#),
            ("Zoë 日本", r#""Zoë 日本""#),
        ];
        for (raw, expected) in cases {
            assert_eq!(quoted(raw), expected, "{raw:?}");

            let parsed: toml::Table = format!("v = {expected}").parse().unwrap();
            assert_eq!(parsed["v"].as_str(), Some(raw));
        }
    }

    #[test]
    fn quoted_variables_use_the_escaper() {
        let ctx = base().full_name(r#"O'Brien "Bob""#).build().unwrap();
        let rc = resolve(&ctx);
        assert_eq!(rc.get("FULL_NAME_QUOTED"), Some(r#""O'Brien \"Bob\"""#));
        assert_eq!(
            rc.get("AUTHOR_QUOTED"),
            Some(r#""O'Brien \"Bob\" <audreyr@example.com>""#)
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let ctx = base().cli(CliFramework::Typer).build().unwrap();
        assert_eq!(resolve(&ctx), resolve(&ctx));
    }

    #[test]
    fn condition_parses_manifest_names() {
        assert_eq!("cli-module".parse::<Condition>().unwrap(), Condition::CliModule);
        assert!("docs".parse::<Condition>().is_err());
    }
}
