//! Relay configuration loaded from file and environment.

use crate::model_gateway::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;
use std::path::Path;

/// Relay settings.
///
/// | Source | Key | Default |
/// |--------|-----|---------|
/// | file / `DOSSIER__HOST` | host | 127.0.0.1 |
/// | file / `DOSSIER__PORT` / `PORT` | port | 3000 |
/// | file / `DOSSIER__MODEL` | model | gpt-4o-mini |
/// | file / `DOSSIER__OPENAI_BASE_URL` | openai_base_url | https://api.openai.com/v1 |
///
/// The credential is not part of this struct; see [`api_key_from_env`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub openai_base_url: String,
}

impl RelayConfig {
    /// Precedence: env `DOSSIER_CONFIG` path > `config/relay` > defaults, then `DOSSIER__*`
    /// variables, then a bare `PORT`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("DOSSIER_CONFIG").unwrap_or_else(|_| "config/relay".to_string());
        let builder = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000_i64)?
            .set_default("model", DEFAULT_MODEL)?
            .set_default("openai_base_url", DEFAULT_BASE_URL)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder.add_source(config::File::with_name(&config_path).required(false))
        };

        let builder = builder.add_source(config::Environment::with_prefix("DOSSIER").separator("__"));
        let builder = match std::env::var("PORT").ok().and_then(|p| p.trim().parse::<i64>().ok()) {
            Some(port) => builder.set_override("port", port)?,
            None => builder,
        };

        builder.build()?.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads `OPENAI_API_KEY` once. Unset or blank => `None`.
pub fn api_key_from_env() -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
