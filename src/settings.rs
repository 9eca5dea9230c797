use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "RECORD_PARSER";

/// Runtime settings, read from `RECORD_PARSER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub pretty: bool,
    /// Lines handed to rayon at once in batch mode.
    pub chunk_size: usize,
    pub include_notices: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: false,
            chunk_size: 500,
            include_notices: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder().add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.chunk_size = settings.chunk_size.max(1);
        Ok(settings)
    }
}
