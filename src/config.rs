use crate::error::{PlotCareError, Result};
use crate::models::{CropProfile, PlantingContext};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub plantings: Vec<PlantingConfig>,
    /// Extra or overriding crop profiles registered on top of the builtin catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crops: Vec<CropProfile>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Use the telemetry simulator when no backend is configured.
    #[serde(default = "default_enabled")]
    pub simulate_without_backend: bool,
}

fn default_poll_interval() -> u64 {
    300
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            simulate_without_backend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlantingConfig {
    pub crop_type: String,
    pub planted_on: String,
    pub garden: String,
    /// Backend id of the plot, needed for telemetry polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garden_id: Option<i64>,
}

impl PlantingConfig {
    pub fn context(&self) -> PlantingContext {
        PlantingContext::new(&self.crop_type, &self.planted_on, &self.garden)
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(PlotCareError::Config(format!(
                "Config file not found at {:?}. Run `plotcare init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| PlotCareError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Load the config if one exists; otherwise run with an empty config so
    /// that stateless commands work out of the box.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if config_override.is_some() || Self::exists(None) {
            return Self::load(config_override);
        }
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        serde_yaml::from_str(&content)
            .map_err(|e| PlotCareError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("plotcare").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/plotcare/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlotCareError::Config("Cannot determine config directory".into()))?
            .join("plotcare");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive(crop_ids: &[String]) -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| PlotCareError::Config(format!("Input error: {}", e));

        println!();
        println!("Let's set up plotcare!");
        println!();

        // --- First planting ---
        println!("Planting (available crops: {})", crop_ids.join(", "));
        let crop_type: String = Input::new()
            .with_prompt("  Crop")
            .default("tomato".into())
            .validate_with(|v: &String| {
                if crop_ids.iter().any(|c| c == v) {
                    Ok(())
                } else {
                    Err(format!("unknown crop '{}'", v))
                }
            })
            .interact_text()
            .map_err(input_err)?;

        let planted_on: String = Input::new()
            .with_prompt("  Planted on (YYYY-MM-DD)")
            .default(chrono::Utc::now().format("%Y-%m-%d").to_string())
            .interact_text()
            .map_err(input_err)?;

        let garden: String = Input::new()
            .with_prompt("  Plot label")
            .default("My Plot".into())
            .interact_text()
            .map_err(input_err)?;

        let garden_id_raw: String = Input::new()
            .with_prompt("  Backend plot id (blank if none)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;
        let garden_id = garden_id_raw.trim().parse::<i64>().ok();

        println!();

        // --- Backend (optional) ---
        println!("Plot backend (leave URL blank to skip)");
        let base_url: String = Input::new()
            .with_prompt("  Base URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        let backend = if base_url.is_empty() {
            None
        } else {
            let token: String = Password::new()
                .with_prompt("  Token")
                .allow_empty_password(true)
                .interact()
                .map_err(input_err)?;

            Some(BackendConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
                enabled: true,
            })
        };

        let poll_interval_secs: u64 = Input::new()
            .with_prompt("  Poll interval (seconds)")
            .default(default_poll_interval())
            .interact_text()
            .map_err(input_err)?;

        println!();

        let config = Config {
            backend,
            monitor: MonitorConfig {
                poll_interval_secs,
                simulate_without_backend: true,
            },
            plantings: vec![PlantingConfig {
                crop_type,
                planted_on,
                garden,
                garden_id,
            }],
            crops: Vec::new(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| PlotCareError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# plotcare configuration\n# Generated by `plotcare init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| PlotCareError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            match std::env::var(var_name) {
                Ok(value) => result = result.replace(placeholder, &value),
                Err(_) => tracing::warn!(var = %var_name, "Config references unset variable"),
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("PLOTCARE_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| PlotCareError::Config("Cannot determine data directory".into()))?
            .join("plotcare");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("plotcare.db"))
    }

    /// The backend, if configured and enabled.
    pub fn active_backend(&self) -> Option<&BackendConfig> {
        self.backend
            .as_ref()
            .filter(|b| b.enabled && !b.base_url.is_empty())
    }
}
