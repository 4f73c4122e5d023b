use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/smartspend.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding every persisted key.
    pub data_path: String,
    pub level: String,
    /// `false` keeps the previous expense list when the last one is deleted.
    pub persist_empty_expenses: bool,
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: "data/smartspend.json".to_string(),
            level: "info".to_string(),
            persist_empty_expenses: true,
            recent_limit: engine::RECENT_LIMIT,
        }
    }
}

pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SMARTSPEND"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(data_path) = &args.data_path {
        settings.data_path = data_path.clone();
    }
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }

    Ok(settings)
}
