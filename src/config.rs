use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{validate_seed, AspectRatio, SeedMode, Style};

/// Environment variable holding the fal.ai credential
pub const API_KEY_ENV: &str = "FAL_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tui: TuiConfig,

    #[serde(skip)]
    pub config_path: PathBuf,

    /// Credential from the environment; never written back to the file
    #[serde(skip)]
    pub env_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub seed_mode: SeedModeSetting,
    #[serde(default = "default_seed")]
    pub seed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_display")]
    pub display: DisplayMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_true")]
    pub show_tutorial: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeedModeSetting {
    #[default]
    Random,
    Locked,
}

impl SeedModeSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedModeSetting::Random => "random",
            SeedModeSetting::Locked => "locked",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["random", "locked"]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Terminal,
    None,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Terminal => "terminal",
            DisplayMode::None => "none",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["terminal", "none"]
    }
}

// Default value functions
fn default_model() -> String {
    "fal-ai/flux/schnell".to_string()
}

fn default_base_url() -> String {
    "https://fal.run".to_string()
}

fn default_seed() -> u32 {
    42
}

fn default_output_directory() -> String {
    "./sparkflow-output".to_string()
}

fn default_display() -> DisplayMode {
    DisplayMode::Terminal
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            aspect_ratio: AspectRatio::default(),
            seed_mode: SeedModeSetting::default(),
            seed: default_seed(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            display: default_display(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { show_tutorial: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            defaults: DefaultsConfig::default(),
            output: OutputConfig::default(),
            tui: TuiConfig::default(),
            config_path: PathBuf::new(),
            env_key: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "sparkflow", "sparkflow-studio")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it on first run.
    /// `FAL_KEY` from the environment wins over the file.
    pub fn load_or_create() -> Result<Self> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        Self::load_from(&Self::config_path()?, env_key)
    }

    /// Load config from `path`, creating a default file when missing
    pub fn load_from(path: &Path, env_key: Option<String>) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&content).context("Failed to parse config file")?;
            validate_seed(config.defaults.seed).context("Invalid defaults.seed in config file")?;
            config.config_path = path.to_path_buf();
            config
        } else {
            let config = Config {
                config_path: path.to_path_buf(),
                ..Config::default()
            };
            config.save()?;
            config
        };

        config.apply_env_key(env_key);
        Ok(config)
    }

    /// Environment credential takes precedence over the file
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        self.env_key = env_key.filter(|k| !k.trim().is_empty());
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

    /// API credential, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.env_key
            .as_deref()
            .or(self.api.key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Seed mode the studio starts in
    pub fn seed_mode(&self) -> SeedMode {
        match self.defaults.seed_mode {
            SeedModeSetting::Random => SeedMode::Random,
            SeedModeSetting::Locked => SeedMode::Locked(self.defaults.seed),
        }
    }

    /// Set a config value by key path (e.g., "api.key", "defaults.style")
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.key" => self.api.key = Some(value.to_string()),
            "api.model" => self.api.model = value.to_string(),
            "api.base_url" => self.api.base_url = value.trim_end_matches('/').to_string(),
            "defaults.style" => self.defaults.style = Style::parse(value)?,
            "defaults.aspect_ratio" => self.defaults.aspect_ratio = AspectRatio::parse(value)?,
            "defaults.seed_mode" => {
                self.defaults.seed_mode = match value.to_lowercase().as_str() {
                    "random" => SeedModeSetting::Random,
                    "locked" => SeedModeSetting::Locked,
                    _ => anyhow::bail!(
                        "Invalid seed mode. Valid values: {}",
                        SeedModeSetting::variants().join(", ")
                    ),
                };
            }
            "defaults.seed" => {
                let seed: u32 = value.parse().context("Invalid seed value")?;
                self.defaults.seed = validate_seed(seed)?;
            }
            "output.directory" => self.output.directory = value.to_string(),
            "output.display" => {
                self.output.display = match value.to_lowercase().as_str() {
                    "terminal" => DisplayMode::Terminal,
                    "none" => DisplayMode::None,
                    _ => anyhow::bail!(
                        "Invalid display mode. Valid values: {}",
                        DisplayMode::variants().join(", ")
                    ),
                };
            }
            "tui.show_tutorial" => {
                self.tui.show_tutorial = value.parse().context("Invalid boolean value")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.key" => self.api_key().map(|_| "****".to_string()), // Mask API key
            "api.model" => Some(self.api.model.clone()),
            "api.base_url" => Some(self.api.base_url.clone()),
            "defaults.style" => Some(self.defaults.style.label().to_string()),
            "defaults.aspect_ratio" => Some(self.defaults.aspect_ratio.ratio().to_string()),
            "defaults.seed_mode" => Some(self.defaults.seed_mode.as_str().to_string()),
            "defaults.seed" => Some(self.defaults.seed.to_string()),
            "output.directory" => Some(self.output.directory.clone()),
            "output.display" => Some(self.output.display.as_str().to_string()),
            "tui.show_tutorial" => Some(self.tui.show_tutorial.to_string()),
            _ => None,
        }
    }

    /// Get all config keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "api.key",
            "api.model",
            "api.base_url",
            "defaults.style",
            "defaults.aspect_ratio",
            "defaults.seed_mode",
            "defaults.seed",
            "output.directory",
            "output.display",
            "tui.show_tutorial",
        ]
    }
}
