//! Startup configuration: YAML file defaults overridden by CLI flags.
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::board::RollTiming;
use crate::error::{FlapboardError, Result};

pub const DEFAULT_FEED_URL: &str = "http://localhost:8080/prices.json";
/// Upper bound for every millisecond setting.
pub const MAX_INTERVAL_MS: u64 = 3_600_000;

#[derive(Debug, Parser)]
#[command(name = "flapboard", about = "Split-flap price ticker for the terminal")]
pub struct Cli {
    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Feed URL, overrides the config file
    #[arg(long)]
    pub feed_url: Option<String>,

    /// Start with the clack audio switched off
    #[arg(long)]
    pub mute: bool,

    /// Audio file looped as ambient background
    #[arg(long)]
    pub ambient: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed_url: String,
    pub refresh_ms: u64,
    pub roll_ms: u64,
    pub step_ms: u64,
    pub stagger_ms: u64,
    pub settle_margin_ms: u64,
    pub idle_flap_ms: u64,
    pub audio_probe_ms: u64,
    pub request_timeout_ms: u64,
    pub clack_on: bool,
    pub ambient_path: Option<PathBuf>,
    pub ambient_volume: f32,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            refresh_ms: 30_000,
            roll_ms: 2_000,
            step_ms: 55,
            stagger_ms: 40,
            settle_margin_ms: 50,
            idle_flap_ms: 90_000,
            audio_probe_ms: 25_000,
            request_timeout_ms: 10_000,
            clack_on: true,
            ambient_path: None,
            ambient_volume: 0.18,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl Config {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        config.validated()
    }

    /// Builds the effective config: file (if any), then CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Some(url) = &cli.feed_url {
            config.feed_url = url.clone();
        }
        if cli.mute {
            config.clack_on = false;
        }
        if let Some(path) = &cli.ambient {
            config.ambient_path = Some(path.clone());
        }
        if let Some(dir) = &cli.log_dir {
            config.log_dir = dir.clone();
        }

        config.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if self.feed_url.trim().is_empty() {
            return Err(FlapboardError::ConfigError("feed_url must not be empty".into()));
        }
        for (name, value) in [
            ("refresh_ms", self.refresh_ms),
            ("step_ms", self.step_ms),
            ("idle_flap_ms", self.idle_flap_ms),
            ("audio_probe_ms", self.audio_probe_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ] {
            if value == 0 {
                return Err(FlapboardError::ConfigError(format!("{} must be greater than zero", name)));
            }
        }
        for (name, value) in [
            ("refresh_ms", self.refresh_ms),
            ("roll_ms", self.roll_ms),
            ("step_ms", self.step_ms),
            ("stagger_ms", self.stagger_ms),
            ("settle_margin_ms", self.settle_margin_ms),
            ("idle_flap_ms", self.idle_flap_ms),
            ("audio_probe_ms", self.audio_probe_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ] {
            if value > MAX_INTERVAL_MS {
                return Err(FlapboardError::ConfigError(format!("{} must not exceed {}", name, MAX_INTERVAL_MS)));
            }
        }
        if self.stagger_ms > self.roll_ms {
            return Err(FlapboardError::ConfigError("stagger_ms must not exceed roll_ms".into()));
        }
        self.ambient_volume = self.ambient_volume.clamp(0.0, 1.0);
        Ok(self)
    }

    pub fn roll_timing(&self) -> RollTiming {
        RollTiming {
            roll: Duration::from_millis(self.roll_ms),
            step: Duration::from_millis(self.step_ms),
            stagger: Duration::from_millis(self.stagger_ms),
            settle_margin: Duration::from_millis(self.settle_margin_ms),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn idle_flap_interval(&self) -> Duration {
        Duration::from_millis(self.idle_flap_ms)
    }

    pub fn audio_probe_interval(&self) -> Duration {
        Duration::from_millis(self.audio_probe_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
