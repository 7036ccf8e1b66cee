//! `bakery config`: read and write configuration values.

use std::path::Path;

use bakery_core::domain::{Context, parse_bool};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli as _},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = AppConfig::resolve_path(global.config.as_deref());

    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&get_config_value(&config, &key)?)?;
        }
        ConfigCommands::Set { key, value } => {
            set_config_value(&path, &key, &value)?;
            output.success(&format!("{key} = {value} (saved to {})", path.display()))?;
        }
        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config)
                .map_err(|e| CliError::config("failed to serialise config", e))?;
            output.print(&serialised)?;
        }
        ConfigCommands::Path => {
            output.data(&path.display().to_string())?;
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!(
            "Unknown config key '{key}'; known keys: {}",
            AppConfig::known_keys().join(", ")
        ),
        source: None,
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match config.get(key) {
        Some(serde_json::Value::Null) => Ok("(unset)".into()),
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(other) => Ok(other.to_string()),
        None => Err(unknown_key(key)),
    }
}

/// Update one key in the config file, creating the file if needed.
///
/// `defaults.*` values are checked against the option's domain before
/// anything is written.
fn set_config_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    if !AppConfig::is_known_key(key) {
        return Err(unknown_key(key));
    }
    let Some((section, field)) = key.split_once('.') else {
        return Err(unknown_key(key));
    };

    let new_value = match (section, field) {
        ("defaults", option) => {
            Context::builder(2000).set(option, value)?;
            toml::Value::String(value.to_string())
        }
        ("output", "no_color") => toml::Value::Boolean(parse_bool(key, value)?),
        _ => toml::Value::String(value.to_string()),
    };

    let mut doc = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read config '{}'", path.display()))?;
        text.parse::<toml::Table>()
            .map_err(|e| CliError::config(format!("{} is not valid TOML", path.display()), e))?
    } else {
        toml::Table::new()
    };

    let table = doc
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(table) = table else {
        return Err(CliError::ConfigError {
            message: format!("[{section}] in {} is not a table", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), new_value);

    let text = toml::to_string_pretty(&doc)
        .map_err(|e| CliError::config("failed to serialise config", e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;
    Ok(())
}
