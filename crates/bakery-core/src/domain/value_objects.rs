//! Domain value objects: License, CliFramework, TestFramework, Formatter.
//!
//! # Design
//!
//! These are pure value types: `Copy`, compared by value, with no identity.
//! Each one is a closed domain: the `ALL` constant lists every member, and
//! `FromStr` rejects anything outside it with [`DomainError::InvalidOption`]
//! naming the option and the allowed values. What each value *means* for the
//! generated project lives in `rules.rs`.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `ALL` entry and the `FromStr` arm here
//! 3. Add the fragment text in `rules.rs`
//! 4. Nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option keys as they appear in `--set KEY=VALUE` and config files.
pub mod keys {
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const GITHUB_USERNAME: &str = "github_username";
    pub const PROJECT_NAME: &str = "project_name";
    pub const PROJECT_SLUG: &str = "project_slug";
    pub const PROJECT_SHORT_DESCRIPTION: &str = "project_short_description";
    pub const VERSION: &str = "version";
    pub const LICENSE: &str = "open_source_license";
    pub const CLI: &str = "command_line_interface";
    pub const USE_PYTEST: &str = "use_pytest";
    pub const FORMATTER: &str = "formatter";
    pub const CREATE_AUTHOR_FILE: &str = "create_author_file";

    /// Every key the context accepts, in display order.
    pub const ALL: &[&str] = &[
        FULL_NAME,
        EMAIL,
        GITHUB_USERNAME,
        PROJECT_NAME,
        PROJECT_SLUG,
        PROJECT_SHORT_DESCRIPTION,
        VERSION,
        LICENSE,
        CLI,
        USE_PYTEST,
        FORMATTER,
        CREATE_AUTHOR_FILE,
    ];
}

// ── License ───────────────────────────────────────────────────────────────────

/// License of the generated package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum License {
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "ISC")]
    Isc,
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-3.0-only")]
    Gpl3Only,
    #[serde(rename = "Not open source")]
    NotOpenSource,
}

impl License {
    pub const ALL: &'static [License] = &[
        Self::Mit,
        Self::Bsd3Clause,
        Self::Isc,
        Self::Apache2,
        Self::Gpl3Only,
        Self::NotOpenSource,
    ];

    /// SPDX identifier, or the literal choice label for proprietary code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mit => "MIT",
            Self::Bsd3Clause => "BSD-3-Clause",
            Self::Isc => "ISC",
            Self::Apache2 => "Apache-2.0",
            Self::Gpl3Only => "GPL-3.0-only",
            Self::NotOpenSource => "Not open source",
        }
    }

    pub const fn is_open_source(&self) -> bool {
        !matches!(self, Self::NotOpenSource)
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mit" => Ok(Self::Mit),
            "bsd-3-clause" | "bsd3" | "bsd-3" => Ok(Self::Bsd3Clause),
            "isc" => Ok(Self::Isc),
            "apache-2.0" | "apache2" | "apache" => Ok(Self::Apache2),
            "gpl-3.0-only" | "gpl3" | "gpl-3.0" => Ok(Self::Gpl3Only),
            "not open source" | "not-open-source" | "proprietary" | "none" => {
                Ok(Self::NotOpenSource)
            }
            _ => Err(invalid(keys::LICENSE, s, Self::ALL.iter().map(|l| l.as_str()))),
        }
    }
}

// ── CliFramework ──────────────────────────────────────────────────────────────

/// Framework used for the generated console entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliFramework {
    #[serde(rename = "No command-line interface")]
    None,
    Click,
    Typer,
    Argparse,
}

impl CliFramework {
    pub const ALL: &'static [CliFramework] =
        &[Self::None, Self::Click, Self::Typer, Self::Argparse];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "No command-line interface",
            Self::Click => "Click",
            Self::Typer => "Typer",
            Self::Argparse => "Argparse",
        }
    }

    /// Lowercase identifier used to key embedded CLI module bodies.
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Click => "click",
            Self::Typer => "typer",
            Self::Argparse => "argparse",
        }
    }

    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for CliFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CliFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no command-line interface" | "none" | "no" | "n" => Ok(Self::None),
            "click" => Ok(Self::Click),
            "typer" => Ok(Self::Typer),
            "argparse" => Ok(Self::Argparse),
            _ => Err(invalid(keys::CLI, s, Self::ALL.iter().map(|c| c.as_str()))),
        }
    }
}

// ── TestFramework ─────────────────────────────────────────────────────────────

/// Test style of the generated test module.
///
/// Chosen through the boolean `use_pytest` option; `Unittest` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    #[default]
    Unittest,
    Pytest,
}

impl TestFramework {
    pub const fn from_use_pytest(use_pytest: bool) -> Self {
        if use_pytest { Self::Pytest } else { Self::Unittest }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unittest => "unittest",
            Self::Pytest => "pytest",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Formatter ─────────────────────────────────────────────────────────────────

/// Code formatter wired into the generated dev dependencies and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formatter {
    Black,
    #[serde(rename = "Ruff-format")]
    RuffFormat,
    #[serde(rename = "No")]
    None,
}

impl Formatter {
    pub const ALL: &'static [Formatter] = &[Self::Black, Self::RuffFormat, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::RuffFormat => "Ruff-format",
            Self::None => "No",
        }
    }

    /// Package name on PyPI, which is not always the display name.
    pub const fn package(&self) -> Option<&'static str> {
        match self {
            Self::Black => Some("black"),
            Self::RuffFormat => Some("ruff"),
            Self::None => None,
        }
    }

    /// Check-mode command line run by the lint task.
    pub const fn check_command(&self) -> Option<&'static str> {
        match self {
            Self::Black => Some("black --check src tests"),
            Self::RuffFormat => Some("ruff format --check src tests"),
            Self::None => None,
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formatter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "ruff-format" | "ruff" => Ok(Self::RuffFormat),
            "no" | "none" | "n" => Ok(Self::None),
            _ => Err(invalid(
                keys::FORMATTER,
                s,
                Self::ALL.iter().map(|f| f.as_str()),
            )),
        }
    }
}

// ── Booleans ──────────────────────────────────────────────────────────────────

/// Parse a yes/no option value.
pub fn parse_bool(option: &str, s: &str) -> Result<bool, DomainError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(DomainError::invalid_option(option, s, &["y", "n"])),
    }
}

fn invalid<'a>(option: &str, value: &str, allowed: impl Iterator<Item = &'a str>) -> DomainError {
    DomainError::InvalidOption {
        option: option.to_string(),
        value: value.to_string(),
        allowed: allowed.map(str::to_string).collect(),
    }
}
