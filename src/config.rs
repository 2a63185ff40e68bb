use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tool::Offset;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub motion: MotionConfig,
    pub extruders: Vec<ExtruderConfig>,
    pub spindle: SpindleConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Every stepper actuator, in handle order. The first three drive X, Y, Z.
    pub actuators: Vec<String>,
    /// Axis slot whose actuator is swapped between tools
    pub shared_axis: usize,
    /// Simulated execution time of one motion block
    pub block_time_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            actuators: ["alpha", "beta", "gamma", "delta"].iter().map(|s| s.to_string()).collect(),
            shared_axis: 0,
            block_time_ms: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtruderConfig {
    pub name: String,
    pub enable: bool,
    pub offset: Offset,
    /// Actuator that replaces the default one on the shared axis
    pub shared_axis_motor: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpindleConfig {
    pub enable: bool,
    #[serde(rename = "type")]
    pub spindle_type: String,
    pub vfd_type: String,
    pub ignore_on_halt: bool,
    pub offset: Offset,
    pub shared_axis_motor: Option<usize>,
}

impl Default for SpindleConfig {
    fn default() -> Self {
        Self {
            enable: false,
            spindle_type: "pwm".to_string(),
            vfd_type: "none".to_string(),
            ignore_on_halt: false,
            offset: [0.0; 3],
            shared_axis_motor: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tool to select at boot through an ordinary `T<n> M6`
    pub initial_tool: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            motion: MotionConfig::default(),
            extruders: Vec::new(),
            spindle: SpindleConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Logger filter directives: `RUST_LOG` when set, else the configured
    /// `log_level`, else `info`
    pub fn log_filter(&self, rust_log: Option<&str>) -> String {
        rust_log
            .filter(|f| !f.trim().is_empty())
            .or(self.log_level.as_deref())
            .unwrap_or("info")
            .to_string()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
