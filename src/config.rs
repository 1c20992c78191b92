use crate::corner::Corner;
use crate::error::Error;
use crate::geometry::Size;
use crate::Result;
use anyhow::{anyhow, Context};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "volcorner";
pub const FILENAME: &str = "volcorner.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_corner")]
    pub corner: String,
    #[serde(default = "default_activate_size")]
    pub activate_size: u32,
    #[serde(default = "default_deactivate_size")]
    pub deactivate_size: u32,
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
    #[serde(default)]
    pub verbose: u8,
    #[serde(default)]
    pub mixer: MixerConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    #[serde(default = "default_mixer_device")]
    pub device: String,
    #[serde(default = "default_mixer_control")]
    pub control: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_resolution_interval")]
    pub resolution_interval_ms: u64,
    #[serde(default = "default_volume_interval")]
    pub volume_interval_ms: u64,
}

fn default_corner() -> String {
    Corner::TopLeft.id().to_string()
}
fn default_activate_size() -> u32 {
    1
}
fn default_deactivate_size() -> u32 {
    100
}
fn default_scroll_step() -> f64 {
    0.05
}
fn default_mixer_device() -> String {
    "default".to_string()
}
fn default_mixer_control() -> String {
    "Master".to_string()
}
fn default_resolution_interval() -> u64 {
    1000
}
fn default_volume_interval() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corner: default_corner(),
            activate_size: default_activate_size(),
            deactivate_size: default_deactivate_size(),
            scroll_step: default_scroll_step(),
            verbose: 0,
            mixer: MixerConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            device: default_mixer_device(),
            control: default_mixer_control(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            resolution_interval_ms: default_resolution_interval(),
            volume_interval_ms: default_volume_interval(),
        }
    }
}

// Command line values win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub corner: Option<String>,
    pub activate_size: Option<u32>,
    pub deactivate_size: Option<u32>,
    pub verbose: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub corner: Corner,
    pub activate_size: Size,
    pub deactivate_size: Size,
    pub scroll_step: f64,
}

pub fn default_config_path() -> PathBuf {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        });
    config_dir.join(APP_NAME).join(FILENAME)
}

pub fn log_level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    // Never fails. The config is always usable, and anything that went wrong comes back
    // alongside it so it can be reported once logging is set up.
    pub fn load_or_create<P: AsRef<Path>>(
        path: P,
        create_missing: bool,
    ) -> (Self, Option<anyhow::Error>) {
        let path = path.as_ref();

        if !path.exists() {
            let config = Self::default();
            if !create_missing {
                let problem = anyhow!("Config file {:?} not found", path);
                return (config, Some(problem));
            }
            let problem = config
                .save(path)
                .with_context(|| format!("Failed to write default config file {:?}", path))
                .err();
            return (config, problem);
        }

        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(e.context(format!("Failed to read config file {:?}", path))),
            ),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(corner) = overrides.corner {
            self.corner = corner;
        }
        if let Some(activate_size) = overrides.activate_size {
            self.activate_size = activate_size;
        }
        if let Some(deactivate_size) = overrides.deactivate_size {
            self.deactivate_size = deactivate_size;
        }
        if let Some(verbose) = overrides.verbose {
            self.verbose = verbose;
        }
    }

    pub fn validate(&self) -> std::result::Result<Settings, Error> {
        let corner = Corner::from_id(&self.corner)?;

        if self.activate_size == 0 {
            return Err(Error::InvalidConfig(
                "activate_size must be at least 1".to_string(),
            ));
        }
        if self.deactivate_size < self.activate_size {
            return Err(Error::InvalidConfig(format!(
                "deactivate_size {} is smaller than activate_size {}",
                self.deactivate_size, self.activate_size
            )));
        }
        if !(self.scroll_step > 0.0 && self.scroll_step <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "scroll_step {} must be in (0.0, 1.0]",
                self.scroll_step
            )));
        }

        Ok(Settings {
            corner,
            activate_size: Size::square(self.activate_size),
            deactivate_size: Size::square(self.deactivate_size),
            scroll_step: self.scroll_step,
        })
    }

    pub fn resolution_interval(&self) -> Duration {
        Duration::from_millis(self.poll.resolution_interval_ms)
    }

    pub fn volume_interval(&self) -> Duration {
        Duration::from_millis(self.poll.volume_interval_ms)
    }
}
