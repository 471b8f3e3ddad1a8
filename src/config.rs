use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(skip)]
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_generate_model")]
    pub generate_model: String,
    #[serde(default = "default_edit_model")]
    pub edit_model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_size")]
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub auto_save: bool,
    #[serde(default = "default_true")]
    pub preview: bool,
}

// Default value functions
fn default_generate_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

fn default_edit_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_size() -> String {
    "1K".to_string()
}

fn default_output_directory() -> String {
    "./foto-output".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            generate_model: default_generate_model(),
            edit_model: default_edit_model(),
            base_url: default_base_url(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            auto_save: true,
            preview: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            defaults: DefaultsConfig::default(),
            output: OutputConfig::default(),
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fotostudio", "foto")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from file or create default
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        // Environment variable takes precedence over the config file
        let env_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&content).context("Failed to parse config file")?;
            config.config_path = config_path;

            if let Some(key) = env_key {
                config.api.key = Some(key);
            }

            Ok(config)
        } else {
            let mut config = Config::default();
            config.config_path = config_path;

            if let Some(key) = env_key {
                config.api.key = Some(key);
            }

            config.save()?;
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get API key (from config or environment)
    pub fn api_key(&self) -> Option<&str> {
        self.api.key.as_deref()
    }

    /// Set a config value by key path (e.g., "api.key", "defaults.size")
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.key" => self.api.key = Some(value.to_string()),
            "api.generate_model" => self.api.generate_model = value.to_string(),
            "api.edit_model" => self.api.edit_model = value.to_string(),
            "api.base_url" => self.api.base_url = value.to_string(),
            "defaults.size" => {
                let valid = Self::sizes();
                if valid.contains(&value) {
                    self.defaults.size = value.to_string();
                } else {
                    anyhow::bail!("Invalid size. Valid values: {}", valid.join(", "));
                }
            }
            "output.directory" => self.output.directory = value.to_string(),
            "output.auto_save" => {
                self.output.auto_save = value.parse().context("Invalid boolean value")?;
            }
            "output.preview" => {
                self.output.preview = value.parse().context("Invalid boolean value")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.key" => self.api.key.clone().map(|_| "****".to_string()), // Mask API key
            "api.generate_model" => Some(self.api.generate_model.clone()),
            "api.edit_model" => Some(self.api.edit_model.clone()),
            "api.base_url" => Some(self.api.base_url.clone()),
            "defaults.size" => Some(self.defaults.size.clone()),
            "output.directory" => Some(self.output.directory.clone()),
            "output.auto_save" => Some(self.output.auto_save.to_string()),
            "output.preview" => Some(self.output.preview.to_string()),
            _ => None,
        }
    }

    /// Get all config keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "api.key",
            "api.generate_model",
            "api.edit_model",
            "api.base_url",
            "defaults.size",
            "output.directory",
            "output.auto_save",
            "output.preview",
        ]
    }

    /// Available sizes
    pub fn sizes() -> &'static [&'static str] {
        &["1K", "2K", "4K"]
    }

    /// Available models
    pub fn models() -> &'static [&'static str] {
        &["gemini-3-pro-image-preview", "gemini-2.5-flash-image"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_bad_size() {
        let mut config = Config::default();
        assert!(config.set("defaults.size", "8K").is_err());
        assert!(config.set("defaults.size", "2K").is_ok());
        assert_eq!(config.defaults.size, "2K");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut config = Config::default();
        assert!(config.set("defaults.aspect_ratio", "16:9").is_err());
    }

    #[test]
    fn api_key_is_masked_on_get() {
        let mut config = Config::default();
        assert_eq!(config.get("api.key"), None);
        config.set("api.key", "secret").unwrap();
        assert_eq!(config.get("api.key").as_deref(), Some("****"));
    }

    #[test]
    fn every_key_round_trips_through_get() {
        let config = Config::default();
        for key in Config::keys() {
            if *key == "api.key" {
                continue;
            }
            assert!(config.get(key).is_some(), "missing value for {key}");
        }
    }
}
