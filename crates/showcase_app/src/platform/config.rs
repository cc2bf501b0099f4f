use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use showcase_engine::{
    BackendSettings, ResolverSettings, DEFAULT_BACKEND_URL, DEFAULT_METADATA_ENDPOINT,
};
use showcase_logging::showcase_info;

use super::logging::{LogDestination, LogLevel};

const DEFAULT_CONFIG_FILENAME: &str = "showcase.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub metadata_endpoint: String,
    pub connect_timeout_ms: u64,
    /// Unset means metadata lookups and analysis requests never time out.
    pub request_timeout_ms: Option<u64>,
    pub max_body_bytes: u64,
    /// How long the terminal front end waits for pending work before printing.
    pub wait_ms: u64,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            metadata_endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
            max_body_bytes: 1024 * 1024,
            wait_ms: 15_000,
            log_destination: LogDestination::File,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            endpoint: self.metadata_endpoint.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            ..BackendSettings::default()
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// Loads the configuration. An explicit path must exist; without one,
/// `./showcase.ron` is used when present and defaults otherwise.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !path.exists() {
                return Ok(AppConfig::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("parsing config {}", path.display()))?;
    showcase_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn parse(content: &str) -> anyhow::Result<AppConfig> {
    Ok(ron::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::{load, parse, AppConfig};
    use crate::platform::logging::{LogDestination, LogLevel};

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse("(backend_url: \"http://analysis.local\", request_timeout_ms: Some(2500))")
            .unwrap();
        assert_eq!(config.backend_url, "http://analysis.local");
        assert_eq!(config.request_timeout_ms, Some(2500));
        assert_eq!(config.metadata_endpoint, AppConfig::default().metadata_endpoint);
        assert_eq!(
            config.resolver_settings().request_timeout,
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn default_has_no_request_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.resolver_settings().request_timeout, None);
        assert_eq!(config.backend_settings().request_timeout, None);
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "(metadata_endpoint: \"http://meta.local/\", log_destination: Terminal, log_level: Debug, wait_ms: 10)"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.metadata_endpoint, "http://meta.local/");
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.wait_ms, 10);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(dir.path().join("absent.ron").as_path())).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(wait_ms: \"soon\")").unwrap();
        assert!(load(Some(file.path())).is_err());
    }
}
