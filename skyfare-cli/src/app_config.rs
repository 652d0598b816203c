use serde::Deserialize;
use std::env;
use std::path::Path;

use skyfare_offer::{DisplayConfig, EndpointConfig, GenerationConfig};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
    pub token: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_currency() -> String { "rub".to_string() }
fn default_timeout_seconds() -> u64 { 15 }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            token: None,
            currency: default_currency(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    /// Layered load from `dir`: `default`, then `$RUN_MODE`, then `local`,
    /// then `SKYFARE__SECTION__KEY` environment variables. Every file is optional.
    pub fn load(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let dir = dir.display();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(
                config::Environment::with_prefix("SKYFARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/skyfare-config")).unwrap();
        assert!(config.generation.enabled);
        assert_eq!(config.generation.min_offers, 3);
        assert_eq!(config.generation.max_offers, 6);
        assert_eq!(config.provider.currency, "rub");
        assert_eq!(config.display.currency_suffix, "₽");
    }

    #[test]
    fn test_shipped_defaults_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config");
        let config = Config::load(&dir).unwrap();
        assert_eq!(config.provider.endpoints.len(), 2);
        assert_eq!(config.provider.endpoints[0].name, "local-proxy");
        assert_eq!(config.provider.timeout_seconds, 15);
        assert_eq!(config.display.thousands_separator, ' ');
    }
}
