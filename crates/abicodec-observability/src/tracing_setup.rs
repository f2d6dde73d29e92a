//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_component(mut self, component: impl Into<String>, level: impl Into<String>) -> Self {
        self.components.insert(component.into(), level.into());
        self
    }

    /// Filter directives, e.g. `"warn,abicodec_evm=debug"`. Component names
    /// may use dashes; they are mapped to the crate's module path.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }

    /// `RUST_LOG` when set and valid, else the configured directives, else
    /// plain `warn`.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.directives()))
            .unwrap_or_else(|_| EnvFilter::new(default_level()))
    }
}

/// Install the global subscriber. Call once at startup; a second call
/// returns an error and leaves the first subscriber in place.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = config.filter();

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_components() {
        let config = LogConfig::default()
            .with_level("info")
            .with_component("abicodec-evm", "debug")
            .with_component("abicodec_core", "trace");
        assert_eq!(config.directives(), "info,abicodec_core=trace,abicodec_evm=debug");
    }

    #[test]
    fn serde_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.directives(), "warn");

        let config: LogConfig =
            serde_json::from_str(r#"{"level":"debug","json":true,"components":{"abicodec-evm":"trace"}}"#)
                .unwrap();
        assert!(config.json);
        assert_eq!(config.directives(), "debug,abicodec_evm=trace");
    }

    #[test]
    fn second_init_fails_without_panicking() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
