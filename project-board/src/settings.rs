use std::path::Path;

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

/// What the store does when persisting a pin toggle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum PinFailurePolicy {
    /// Keep the local flag and remember the project for a later retry.
    #[default]
    #[strum(ascii_case_insensitive, serialize = "mark_dirty")]
    MarkDirty,
    /// Undo the local toggle.
    #[strum(ascii_case_insensitive, serialize = "revert")]
    Revert,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default)]
    pub pin_failure_policy: PinFailurePolicy,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Reads settings from defaults, an optional TOML file and `BOARD_*` environment variables.
///
/// Later sources override earlier ones.
pub fn read_settings(config_file: Option<&Path>) -> Result<Settings, config::ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("api_url", "http://localhost:8080")?
        .set_default("pin_failure_policy", PinFailurePolicy::default().to_string())?
        .set_default("log_level", default_log_level())?;

    builder = match config_file {
        Some(path) => builder.add_source(config::File::from(path).required(true)),
        None => builder.add_source(config::File::with_name("board").required(false)),
    };

    let settings = builder
        .add_source(config::Environment::with_prefix("BOARD").prefix_separator("_"))
        .build()?;

    settings.try_deserialize::<Settings>()
}
