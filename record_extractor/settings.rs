use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "record_extractor";
const ENV_PREFIX: &str = "EXTRACT";

/// What to do when two records in one run map to the same file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OnCollision {
    /// Last record wins; a warning names the replaced file.
    #[default]
    Overwrite,
    /// Keep both, numbering the later ones `-2`, `-3`, ...
    Suffix,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub on_collision: OnCollision,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            on_collision: OnCollision::Overwrite,
            log_level: "info".to_string(),
        }
    }
}

/// Defaults, then `record_extractor.toml` (optional), then `EXTRACT_*` env vars.
pub fn load() -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX));
    from_builder(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    builder
        .build()
        .context("reading record_extractor configuration")?
        .try_deserialize()
        .context("invalid record_extractor configuration")
}
