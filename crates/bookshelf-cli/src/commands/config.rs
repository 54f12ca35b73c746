//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use bookshelf_core::storage::validate_slot_name;
use bookshelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "store_name": config.store_name,
                    "store_path": config.store_path(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.store_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:   {}", config.data_dir.display());
            println!("  store_name: {}", config.store_name);
            println!(
                "  log_file:   {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
            println!("Store file:  {}", config.store_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "store_name" => {
            validate_slot_name(value).with_context(|| {
                format!(
                    "Invalid store_name '{}'. Use letters, digits, '-', '_' or '.'",
                    value
                )
            })?;
            config.store_name = value.to_string();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, store_name, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "store_name", "my-shelf").unwrap();
        assert_eq!(config.store_name, "my-shelf");

        apply_setting(&mut config, "data_dir", "/tmp/shelf").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shelf"));

        apply_setting(&mut config, "log_file", "/tmp/shelf.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/shelf.log")));
        apply_setting(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "store_name", "").is_err());
        assert!(apply_setting(&mut config, "store_name", "my books").is_err());
        assert!(apply_setting(&mut config, "store_name", "../shelf").is_err());
        assert!(apply_setting(&mut config, "sync_url", "x").is_err());
        assert_eq!(config.store_name, "bookshelf-store");
    }
}
