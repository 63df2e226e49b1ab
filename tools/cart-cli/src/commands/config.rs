//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, LogFormat, StorageKind, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("backend", ctx.config.storage.backend.as_str());
    ctx.output.kv(
        "dir",
        &ctx.config
            .storage
            .resolve_dir(ctx.base_dir())
            .display()
            .to_string(),
    );
    ctx.output.kv("key", &ctx.config.storage.key);

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", format_name(ctx.config.logging.format));

    ctx.output.info("");
    ctx.output.info("[display]");
    ctx.output
        .kv("currency_symbol", &ctx.config.display.currency_symbol);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = ctx.config_path.as_ref() else {
        bail!("No config file found. Run `shopcart config init` to create one.");
    };

    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect (errors, warnings) for a config.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config.storage.key.trim().is_empty() {
        errors.push("storage.key is required".to_string());
    }

    if config.storage.backend == StorageKind::File && config.storage.dir.trim().is_empty() {
        errors.push("storage.dir is required for the file backend".to_string());
    }

    if config.storage.backend == StorageKind::Memory {
        warnings.push("storage.backend = \"memory\" keeps nothing between commands".to_string());
    }

    if tracing_subscriber::EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(format!(
            "logging.level '{}' is not a valid filter",
            config.logging.level
        ));
    }

    if config.display.currency_symbol.is_empty() {
        warnings.push("display.currency_symbol is empty".to_string());
    }

    (errors, warnings)
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Text => "text",
        LogFormat::Json => "json",
    }
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "backend"] => Ok(format!("\"{}\"", config.storage.backend.as_str())),
        ["storage", "dir"] => Ok(format!("\"{}\"", config.storage.dir)),
        ["storage", "key"] => Ok(format!("\"{}\"", config.storage.key)),
        ["logging", "level"] => Ok(format!("\"{}\"", config.logging.level)),
        ["logging", "format"] => Ok(format!("\"{}\"", format_name(config.logging.format))),
        ["display", "currency_symbol"] => {
            Ok(format!("\"{}\"", config.display.currency_symbol))
        }
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "backend"] => {
            config.storage.backend = match StorageKind::parse(value) {
                Some(kind) => kind,
                None => bail!("storage.backend must be \"file\" or \"memory\""),
            }
        }
        ["storage", "dir"] => config.storage.dir = value.to_string(),
        ["storage", "key"] => config.storage.key = value.to_string(),
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => {
            config.logging.format = match value.to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => bail!("logging.format must be \"text\" or \"json\""),
            }
        }
        ["display", "currency_symbol"] => config.display.currency_symbol = value.to_string(),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "storage.backend", "Memory").unwrap();
        set_config_value(&mut config, "display.currency_symbol", "€").unwrap();

        assert_eq!(get_config_value(&config, "storage.backend").unwrap(), "\"memory\"");
        assert_eq!(
            get_config_value(&config, "display.currency_symbol").unwrap(),
            "\"€\""
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut config = CliConfig::default();
        assert!(get_config_value(&config, "storage.nope").is_err());
        assert!(set_config_value(&mut config, "logging.format", "xml").is_err());
        assert!(set_config_value(&mut config, "storage.backend", "redis").is_err());
    }

    #[test]
    fn test_check_config() {
        let (errors, warnings) = check_config(&CliConfig::default());
        assert!(errors.is_empty());
        assert!(warnings.is_empty());

        let mut config = CliConfig::default();
        config.storage.key = " ".into();
        config.storage.backend = StorageKind::Memory;
        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 1);
    }
}
