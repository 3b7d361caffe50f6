//! Configuration commands.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Dump the effective configuration to stdout.
pub fn dump(config: &AppConfig, path: &Path) -> CliResult<()> {
    print!("{}", render_dump(config, path)?);
    Ok(())
}

fn render_dump(config: &AppConfig, path: &Path) -> CliResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))?;
    Ok(format!("# config.toml ({})\n{toml_str}", path.display()))
}

/// Validate the configuration.
pub fn validate(config: &AppConfig) -> CliResult<()> {
    config.validate()?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
