//! Configuration loading and models-directory resolution

use std::path::PathBuf;

use serde::Deserialize;

use crate::{Error, Result};

/// Service configuration for the web UI module.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory containing the external model scripts
    pub models_dir: PathBuf,
    /// Python interpreter used to run the model scripts
    pub python_bin: String,
    /// Chat-completion endpoint for report narration
    pub report_endpoint: String,
    /// Model name passed to the report endpoint
    pub report_model: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5741,
            models_dir: PathBuf::from("models"),
            python_bin: "python3".to_string(),
            report_endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            report_model: "llama-3.1-8b-instant".to_string(),
        }
    }
}

/// Load the service configuration from the platform config file,
/// falling back to defaults when no file exists.
pub fn load_or_default() -> ServiceConfig {
    match load_config_file() {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!("No config file loaded ({}), using defaults", e);
            ServiceConfig::default()
        }
    }
}

/// Load configuration from the first config file found.
///
/// Looks in `$XDG_CONFIG_HOME/pulmotriage/config.toml` (or the platform
/// equivalent), then `/etc/pulmotriage/config.toml` on Linux.
pub fn load_config_file() -> Result<ServiceConfig> {
    let path = find_config_file()?;
    parse_config_file(&path)
}

/// Parse a specific TOML config file.
pub fn parse_config_file(path: &std::path::Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

fn find_config_file() -> Result<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("pulmotriage").join("config.toml"))
    {
        if user_config.exists() {
            return Ok(user_config);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/pulmotriage/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }
    Err(Error::Config("No config file found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 5741);
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(config.python_bin, "python3");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nmodels_dir = \"/srv/models\"").unwrap();

        let config = parse_config_file(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.models_dir, PathBuf::from("/srv/models"));
        // Unspecified keys keep their defaults
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = parse_config_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
