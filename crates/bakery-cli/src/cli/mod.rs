//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "bakery",
    bin_name = "bakery",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Python package scaffolding",
    long_about = "Bakery generates a ready-to-use Python package (poetry, mkdocs, \
                  tox, invoke) from a small set of options.",
    after_help = "EXAMPLES:\n\
        \x20 bakery new --project-name \"Data Tools\" --cli typer --pytest\n\
        \x20 bakery new ./work --license BSD-3-Clause --formatter ruff-format -y\n\
        \x20 bakery new --set open_source_license=ISC --dry-run\n\
        \x20 bakery completions bash > /usr/share/bash-completion/completions/bakery",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new Python package.
    #[command(
        visible_alias = "n",
        about = "Create a new Python package",
        after_help = "EXAMPLES:\n\
            \x20 bakery new --project-name \"Data Tools\"\n\
            \x20 bakery new ./out --cli click --no-pytest --formatter no\n\
            \x20 bakery new --template python-package@1.0.0 --set create_author_file=n"
    )]
    New(NewArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 bakery list\n\
            \x20 bakery list --format json"
    )]
    List(ListArgs),

    /// Show every option with its default and allowed values.
    #[command(about = "Show scaffolding options")]
    Options,

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 bakery init\n\
            \x20 bakery init --force\n\
            \x20 bakery --config ./bakery.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 bakery completions bash > ~/.local/share/bash-completion/completions/bakery\n\
            \x20 bakery completions zsh  > ~/.zfunc/_bakery\n\
            \x20 bakery completions fish > ~/.config/fish/completions/bakery.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Bakery configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 bakery config get defaults.full_name\n\
            \x20 bakery config set defaults.open_source_license ISC\n\
            \x20 bakery config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `bakery new`.
///
/// Option values are kept as strings and validated by the domain so that
/// flags, `--set` pairs and configuration defaults share one error path.
#[derive(Debug, Default, Args)]
pub struct NewArgs {
    /// Directory the project folder is created in.
    #[arg(
        value_name = "OUTPUT_DIR",
        help = "Parent directory for the project (default: current directory)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long = "project-name", value_name = "NAME", help = "Human-readable project name")]
    pub project_name: Option<String>,

    #[arg(
        long = "project-slug",
        value_name = "SLUG",
        help = "Package/module name (default: derived from the project name)"
    )]
    pub project_slug: Option<String>,

    #[arg(long = "full-name", value_name = "NAME", help = "Author name")]
    pub full_name: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help = "Author email")]
    pub email: Option<String>,

    #[arg(long = "github-username", value_name = "USER", help = "GitHub username")]
    pub github_username: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "One-line project description")]
    pub description: Option<String>,

    #[arg(long = "version-string", value_name = "VERSION", help = "Initial package version")]
    pub version: Option<String>,

    #[arg(
        long = "license",
        value_name = "LICENSE",
        help = "MIT, BSD-3-Clause, ISC, Apache-2.0, GPL-3.0-only or \"Not open source\""
    )]
    pub license: Option<String>,

    #[arg(
        long = "cli",
        value_name = "FRAMEWORK",
        help = "none, click, typer or argparse"
    )]
    pub cli: Option<String>,

    /// Generate pytest-style tests.
    #[arg(long = "pytest", overrides_with = "no_pytest", help = "Use pytest")]
    pub pytest: bool,

    /// Generate unittest-style tests.
    #[arg(long = "no-pytest", overrides_with = "pytest", help = "Use unittest")]
    pub no_pytest: bool,

    #[arg(
        long = "formatter",
        value_name = "FORMATTER",
        help = "black, ruff-format or no"
    )]
    pub formatter: Option<String>,

    #[arg(long = "no-author-file", help = "Skip AUTHORS.md and docs/authors.md")]
    pub no_author_file: bool,

    /// Raw option overrides, applied last.
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Set any option by key (repeatable), see `bakery options`"
    )]
    pub set: Vec<(String, String)>,

    #[arg(
        long = "template",
        value_name = "NAME[@VERSION]",
        help = "Template to use (default: python-package, latest version)"
    )]
    pub template: Option<String>,

    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Directory with additional templates"
    )]
    pub templates_dir: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and create immediately")]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

impl NewArgs {
    /// `Some(true)` for `--pytest`, `Some(false)` for `--no-pytest`.
    pub fn use_pytest(&self) -> Option<bool> {
        match (self.pytest, self.no_pytest) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `bakery list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Directory with additional templates"
    )]
    pub templates_dir: Option<PathBuf>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `bakery init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `bakery completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `bakery config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.full_name`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
