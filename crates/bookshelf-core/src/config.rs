//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/bookshelf/config.toml)
//! 3. Environment variables (BOOKSHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::validate_slot_name;

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOKSHELF";

/// Default name of the persistence slot holding the collection
pub const DEFAULT_STORE_NAME: &str = "bookshelf-store";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding persistence slots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the slot the collection is stored under
    #[serde(default = "default_store_name")]
    pub store_name: String,

    /// Log file path (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_name: default_store_name(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BOOKSHELF_DATA_DIR, BOOKSHELF_STORE_NAME, BOOKSHELF_LOG_FILE)
    /// 2. Config file (~/.config/bookshelf/config.toml or BOOKSHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit config path (e.g. `--config`)
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the store could not persist with
    ///
    /// `store_name` becomes a file name, so it must be a valid slot name.
    pub fn validate(&self) -> Result<()> {
        validate_slot_name(&self.store_name)
            .with_context(|| format!("Invalid store_name {:?}", self.store_name))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty values are ignored: the slot always needs a name
        if let Ok(val) = std::env::var(format!("{}_STORE_NAME", ENV_PREFIX)) {
            if !val.is_empty() {
                self.store_name = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with BOOKSHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bookshelf")
            .join("config.toml")
    }

    /// Get the path of the file backing the collection slot
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.store_name))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookshelf")
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "BOOKSHELF_DATA_DIR",
        "BOOKSHELF_STORE_NAME",
        "BOOKSHELF_LOG_FILE",
        "BOOKSHELF_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_name, "bookshelf-store");
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("bookshelf"));
    }

    #[test]
    fn test_store_path() {
        let config = Config {
            data_dir: PathBuf::from("/data/bookshelf"),
            ..Config::default()
        };
        assert_eq!(
            config.store_path(),
            PathBuf::from("/data/bookshelf/bookshelf-store.json")
        );
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSHELF_DATA_DIR", "/tmp/bookshelf-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/bookshelf-test"));
    }

    #[test]
    fn test_env_override_store_name() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSHELF_STORE_NAME", "shelf-test");
        config.apply_env_overrides();
        assert_eq!(config.store_name, "shelf-test");

        // Empty value keeps the current name
        env::set_var("BOOKSHELF_STORE_NAME", "");
        config.apply_env_overrides();
        assert_eq!(config.store_name, "shelf-test");
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSHELF_LOG_FILE", "/tmp/shelf.log");
        config.apply_env_overrides();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/shelf.log")));

        // Empty string clears it
        env::set_var("BOOKSHELF_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/bookshelf"),
            store_name: "my-books".to_string(),
            log_file: Some(PathBuf::from("/var/log/shelf.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("store_name"));
        assert!(toml_str.contains("log_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.store_name, config.store_name);
        assert_eq!(parsed.log_file, config.log_file);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            store_name = "custom-store"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.store_name, "custom-store");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str_env_wins() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("BOOKSHELF_DATA_DIR", "/from/env");
        let config = Config::load_from_str(r#"data_dir = "/from/file""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("BOOKSHELF_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Defaults when the file doesn't exist, data dir still created
        assert_eq!(config.store_name, DEFAULT_STORE_NAME);
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_validate_store_name() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        for name in ["my books", "../escape", ".hidden", "a/b"] {
            config.store_name = name.to_string();
            assert!(config.validate().is_err(), "{name}");
        }
    }

    #[test]
    fn test_load_from_str_rejects_bad_store_name() {
        let _guard = EnvGuard::new(ENV_VARS);

        let err = Config::load_from_str(r#"store_name = "my books""#).unwrap_err();
        assert!(format!("{:#}", err).contains("my books"));
    }

    #[test]
    fn test_load_from_path_rejects_bad_store_name() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "data_dir = {:?}\nstore_name = \".hidden\"\n",
                temp_dir.path().join("data")
            ),
        )
        .unwrap();

        assert!(Config::load_from_path(&config_path).is_err());
        // Nothing is created for a config that won't load
        assert!(!temp_dir.path().join("data").exists());
    }

    #[test]
    fn test_env_store_name_is_validated() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("BOOKSHELF_STORE_NAME", "shelf/nested");
        assert!(Config::load_from_str("").is_err());

        env::set_var("BOOKSHELF_STORE_NAME", "shelf-2");
        assert_eq!(Config::load_from_str("").unwrap().store_name, "shelf-2");
    }

    #[test]
    fn test_save_and_load_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("conf").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            store_name: "saved".to_string(),
            log_file: None,
        };
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&config_path)).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.store_name, "saved");
    }
}
