//! Implementation of the `bakery new` command.
//!
//! Responsibility: layer option values into a `Context`, call the core
//! scaffold service, and display results. No business logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use chrono::Datelike as _;
use serde::Serialize;
use tracing::{debug, info, instrument};

use bakery_adapters::{InMemoryStore, LocalFilesystem, SimpleRenderer};
use bakery_core::{
    application::ScaffoldService,
    domain::{Context, ContextBuilder, FsEntry, ProjectStructure, TemplateRef, keys},
};

use crate::{
    cli::{NewArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `bakery new` command.
///
/// 1. Build the context: built-in defaults, config defaults, flags, `--set`
/// 2. Resolve the template reference and output directory
/// 3. Confirm on a terminal unless `--yes` or `--quiet`
/// 4. Preview (`--dry-run`) or scaffold
/// 5. Print next steps
#[instrument(skip_all)]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let year = chrono::Local::now().year();
    let context = build_context(&args, &config, year)?;
    let template = template_ref(&args, &config)?;
    let output_dir = output_dir(&args, &config);
    let project_root = ScaffoldService::project_root(&context, &output_dir);

    debug!(
        slug = %context.project_slug(),
        template = %template,
        output_dir = %output_dir.display(),
        "Options resolved"
    );

    let templates_dir = args.templates_dir.as_deref().or(config.templates.dir.as_deref());
    let store = InMemoryStore::with_templates_dir(templates_dir)?;
    let service = ScaffoldService::new(
        Box::new(store),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    if args.dry_run {
        let structure = service.preview(&context, &template, &output_dir)?;
        if project_root.exists() {
            output.warning(&format!(
                "{} already exists; a real run would stop here",
                project_root.display()
            ))?;
        }
        return report(&output, &context, &structure, true);
    }

    if !args.yes && !output.is_quiet() && std::io::stdin().is_terminal() {
        show_configuration(&context, &template, &project_root, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Creating '{}'...", context.project_name()))?;
    info!(path = %project_root.display(), "Scaffold started");

    let structure = service.scaffold(&context, &template, &output_dir)?;

    report(&output, &context, &structure, false)
}

/// Layer option values. Later layers win: built-in defaults, config
/// defaults, dedicated flags, then raw `--set` pairs.
pub(crate) fn build_context(args: &NewArgs, config: &AppConfig, year: i32) -> CliResult<Context> {
    let mut builder = Context::builder(year);

    for (key, value) in config.defaults.entries() {
        builder = builder.set(key, value)?;
    }

    builder = apply_flags(builder, args)?;

    for (key, value) in &args.set {
        builder = builder.set(key, value)?;
    }

    Ok(builder.build()?)
}

fn apply_flags(mut builder: ContextBuilder, args: &NewArgs) -> CliResult<ContextBuilder> {
    let yn = |b: bool| if b { "y" } else { "n" };
    let flags: [(&str, Option<&str>); 12] = [
        (keys::PROJECT_NAME, args.project_name.as_deref()),
        (keys::PROJECT_SLUG, args.project_slug.as_deref()),
        (keys::FULL_NAME, args.full_name.as_deref()),
        (keys::EMAIL, args.email.as_deref()),
        (keys::GITHUB_USERNAME, args.github_username.as_deref()),
        (keys::PROJECT_SHORT_DESCRIPTION, args.description.as_deref()),
        (keys::VERSION, args.version.as_deref()),
        (keys::LICENSE, args.license.as_deref()),
        (keys::CLI, args.cli.as_deref()),
        (keys::USE_PYTEST, args.use_pytest().map(yn)),
        (keys::FORMATTER, args.formatter.as_deref()),
        (keys::CREATE_AUTHOR_FILE, args.no_author_file.then_some("n")),
    ];

    for (key, value) in flags {
        if let Some(value) = value {
            builder = builder.set(key, value)?;
        }
    }
    Ok(builder)
}

fn template_ref(args: &NewArgs, config: &AppConfig) -> CliResult<TemplateRef> {
    let raw = args.template.as_deref().unwrap_or(&config.templates.default);
    Ok(raw.parse::<TemplateRef>()?)
}

fn output_dir(args: &NewArgs, config: &AppConfig) -> PathBuf {
    args.output_dir
        .clone()
        .or_else(|| config.output.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── Reporting ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report<'a> {
    project_root: &'a Path,
    dry_run: bool,
    files: Vec<&'a Path>,
    directories: Vec<&'a Path>,
}

fn report(
    output: &OutputManager,
    context: &Context,
    structure: &ProjectStructure,
    dry_run: bool,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let report = Report {
            project_root: structure.root(),
            dry_run,
            files: structure.files().map(|f| f.path.as_path()).collect(),
            directories: structure.directories().map(|d| d.path.as_path()).collect(),
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| CliError::InvalidInput {
            message: "failed to serialise report".into(),
            source: Some(Box::new(e)),
        })?;
        output.data(&json)?;
        return Ok(());
    }

    if dry_run {
        output.info(&format!(
            "Dry run: would create {} files in {}",
            structure.file_count(),
            structure.root().display()
        ))?;
        for entry in structure.entries() {
            if let FsEntry::File(file) = entry {
                output.print(&format!("  {}", output.dim(&file.path.display().to_string())))?;
            }
        }
        return Ok(());
    }

    output.success(&format!(
        "Project '{}' created at {}",
        context.project_name(),
        structure.root().display()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", structure.root().display()))?;
    output.print("  poetry install")?;
    output.print("  poetry run invoke test")?;
    Ok(())
}

fn show_configuration(
    context: &Context,
    template: &TemplateRef,
    project_root: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    for (key, value) in context.entries() {
        out.print(&format!("  {key:<28} {value}"))?;
    }
    out.print(&format!("  {:<28} {template}", "template"))?;
    out.print(&format!("  {:<28} {}", "location", project_root.display()))?;
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_core::domain::{CliFramework, Formatter, License};

    fn config_with_defaults() -> AppConfig {
        let mut config = AppConfig::default();
        config.defaults.full_name = Some("Config Author".into());
        config.defaults.open_source_license = Some("ISC".into());
        config.defaults.formatter = Some("ruff-format".into());
        config
    }

    #[test]
    fn no_input_gives_built_in_defaults() {
        let ctx = build_context(&NewArgs::default(), &AppConfig::default(), 2026).unwrap();
        assert_eq!(ctx.project_slug(), "python_boilerplate");
        assert_eq!(ctx.license(), License::Mit);
        assert_eq!(ctx.cli(), CliFramework::Click);
        assert_eq!(ctx.year(), 2026);
    }

    #[test]
    fn config_defaults_apply() {
        let ctx = build_context(&NewArgs::default(), &config_with_defaults(), 2026).unwrap();
        assert_eq!(ctx.full_name(), "Config Author");
        assert_eq!(ctx.license(), License::Isc);
        assert_eq!(ctx.formatter(), Formatter::RuffFormat);
    }

    #[test]
    fn flags_override_config_and_set_overrides_flags() {
        let args = NewArgs {
            project_name: Some("Data Tools".into()),
            license: Some("MIT".into()),
            cli: Some("typer".into()),
            set: vec![("command_line_interface".into(), "argparse".into())],
            ..NewArgs::default()
        };
        let ctx = build_context(&args, &config_with_defaults(), 2026).unwrap();
        assert_eq!(ctx.project_slug(), "data_tools");
        assert_eq!(ctx.license(), License::Mit);
        assert_eq!(ctx.cli(), CliFramework::Argparse);
    }

    #[test]
    fn pytest_and_author_flags() {
        let args = NewArgs {
            pytest: true,
            no_author_file: true,
            ..NewArgs::default()
        };
        let ctx = build_context(&args, &AppConfig::default(), 2026).unwrap();
        assert!(ctx.use_pytest());
        assert!(!ctx.create_author_file());
    }

    #[test]
    fn invalid_value_is_an_option_error() {
        let args = NewArgs {
            license: Some("WTFPL".into()),
            ..NewArgs::default()
        };
        let err = build_context(&args, &AppConfig::default(), 2026).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_config_default_is_reported() {
        let mut config = AppConfig::default();
        config.defaults.use_pytest = Some("maybe".into());
        let err = build_context(&NewArgs::default(), &config, 2026).unwrap_err();
        assert!(err.to_string().contains("use_pytest"));
    }

    #[test]
    fn template_and_output_dir_fall_back_to_config() {
        let mut config = AppConfig::default();
        config.output.directory = Some(PathBuf::from("/srv/projects"));
        let args = NewArgs::default();

        assert_eq!(template_ref(&args, &config).unwrap(), TemplateRef::named("python-package"));
        assert_eq!(output_dir(&args, &config), PathBuf::from("/srv/projects"));
        assert_eq!(output_dir(&args, &AppConfig::default()), PathBuf::from("."));

        let args = NewArgs {
            template: Some("python-package@1.0.0".into()),
            output_dir: Some(PathBuf::from("out")),
            ..NewArgs::default()
        };
        assert_eq!(template_ref(&args, &config).unwrap().to_string(), "python-package@1.0.0");
        assert_eq!(output_dir(&args, &config), PathBuf::from("out"));
    }
}
