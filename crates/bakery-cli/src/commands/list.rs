//! Implementation of the `bakery list` command.

use bakery_adapters::InMemoryStore;
use bakery_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates_dir = args.templates_dir.as_deref().or(config.templates.dir.as_deref());
    let store = InMemoryStore::with_templates_dir(templates_dir)?;
    let service = TemplateService::new(Box::new(store));

    let templates = service.list_templates()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for line in table_lines(&templates) {
                output.print(&line)?;
            }
        }
        ListFormat::Json => {
            // Parseable even in quiet mode and non-TTY pipes.
            let json = serde_json::to_string_pretty(&templates).map_err(|e| {
                CliError::InvalidInput {
                    message: "failed to serialise template list".into(),
                    source: Some(Box::new(e)),
                }
            })?;
            output.data(&json)?;
        }
        ListFormat::List => {
            for t in &templates {
                output.data(&t.id)?;
            }
        }
        ListFormat::Csv => {
            output.data("id,name,version,description,tags")?;
            for t in &templates {
                output.data(&csv_row(t))?;
            }
        }
    }

    Ok(())
}

fn table_lines(templates: &[TemplateInfo]) -> Vec<String> {
    let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
    templates
        .iter()
        .map(|t| format!("  {:<width$}  {}", t.id, t.description))
        .collect()
}

fn csv_row(t: &TemplateInfo) -> String {
    [
        t.id.as_str(),
        t.name.as_str(),
        t.version.as_str(),
        t.description.as_str(),
        &t.tags.join(" "),
    ]
    .iter()
    .map(|field| csv_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
