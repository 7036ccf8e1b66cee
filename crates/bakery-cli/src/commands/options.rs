//! `bakery options`: every option key with its default and allowed values.

use serde::Serialize;

use bakery_core::domain::{CliFramework, Context, Formatter, License, keys};

use crate::{
    cli::OutputFormat,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize, PartialEq)]
struct OptionRow {
    key: &'static str,
    default: String,
    allowed: Vec<String>,
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    // Fixed year; it only feeds the rendered LICENSE, not any option.
    let rows = option_rows(Context::builder(2000).build()?);

    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&rows).map_err(|e| CliError::InvalidInput {
            message: "failed to serialise options".into(),
            source: Some(Box::new(e)),
        })?;
        return Ok(output.data(&json)?);
    }

    output.header("Options (set with --set KEY=VALUE or in [defaults])")?;
    for row in &rows {
        output.print(&format!("  {:<28} default: {}", row.key, row.default))?;
        if !row.allowed.is_empty() {
            output.print(&format!(
                "  {:<28} {}",
                "",
                output.dim(&format!("one of: {}", row.allowed.join(" | ")))
            ))?;
        }
    }
    Ok(())
}

fn option_rows(defaults: Context) -> Vec<OptionRow> {
    defaults
        .entries()
        .into_iter()
        .map(|(key, default)| OptionRow {
            key,
            default,
            allowed: allowed_values(key),
        })
        .collect()
}

fn allowed_values(key: &str) -> Vec<String> {
    let labels: Vec<&str> = match key {
        keys::LICENSE => License::ALL.iter().map(License::as_str).collect(),
        keys::CLI => CliFramework::ALL.iter().map(CliFramework::as_str).collect(),
        keys::FORMATTER => Formatter::ALL.iter().map(Formatter::as_str).collect(),
        keys::USE_PYTEST | keys::CREATE_AUTHOR_FILE => vec!["y", "n"],
        _ => Vec::new(),
    };
    labels.into_iter().map(String::from).collect()
}
