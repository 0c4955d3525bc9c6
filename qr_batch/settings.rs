use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::render::{Strategy, SvgStyle};

const CONFIG_FILE: &str = "qr_batch";
const ENV_PREFIX: &str = "QR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixels per QR module
    pub module_size: u32,
    pub dark_color: String,
    pub light_color: String,
    pub quiet_zone: bool,
    /// Skips the strategy prompt when set
    pub default_strategy: Option<Strategy>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let style = SvgStyle::default();
        Settings {
            module_size: style.module_size,
            dark_color: style.dark_color,
            light_color: style.light_color,
            quiet_zone: style.quiet_zone,
            default_strategy: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn style(&self) -> SvgStyle {
        SvgStyle {
            module_size: self.module_size.max(1),
            dark_color: self.dark_color.clone(),
            light_color: self.light_color.clone(),
            quiet_zone: self.quiet_zone,
        }
    }
}

/// Defaults, then `qr_batch.toml` (optional), then `QR_*` env vars.
pub fn load() -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX));
    from_builder(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    builder
        .build()
        .context("reading qr_batch configuration")?
        .try_deserialize()
        .context("invalid qr_batch configuration")
}
