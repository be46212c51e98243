use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use std::time::Duration;

const CONFIG_FILE: &'static str = "autopilot.toml";
const CONFIG_NAME: &'static str = "autopilot";
const ENV_PREFIX: &'static str = "AUTOPILOT";

/// Autopilot configuration parameters
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AutopilotParameters {
    /// How often the navigators monitor the vehicle [ms]
    pub period_ms: u64,
    /// Maximum target height [dm]
    pub height_limit_dm: i16,
    /// Height error above which the throttle is at full scale [dm]
    pub height_threshold_dm: i16,
    /// Heading error above which the rotation is at full scale [deg]
    pub yaw_threshold_deg: i16,
    /// Stick value used far from target
    pub full_scale: i16,
    /// Stick value used close to target
    pub half_scale: i16,
}

impl Default for AutopilotParameters {
    fn default() -> Self {
        Self {
            period_ms: 25,
            height_limit_dm: 300,
            height_threshold_dm: 4,
            yaw_threshold_deg: 10,
            full_scale: 32500,
            half_scale: 16250,
        }
    }
}

impl AutopilotParameters {
    /// Defaults, overridden by `autopilot.toml` if present, then by `AUTOPILOT_*` variables
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_NAME)
    }

    /// Same as `load` with another file; the extension may be omitted
    pub fn load_from(name: &str) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Cannot read configuration")?
            .try_deserialize()
            .context("Cannot parse configuration")
    }

    pub fn update(&self) -> Result<()> {
        let config = toml::to_string_pretty(self)?;
        std::fs::write(CONFIG_FILE, config).context("Cannot write configuration file")
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}
