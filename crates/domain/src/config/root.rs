use serde::{Deserialize, Serialize};

use super::client::ClientConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::services::ServiceCatalog;
use super::transport::TransportConfig;
use crate::constants::{DEFAULT_DNS_PORT, DEFAULT_DOT_PORT};
use crate::names::join_host_port;

const LOCAL_CONFIG_FILE: &str = "resolv.toml";

/// Main configuration structure for the resolv tools
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Query flags and CNAME-following policy
    #[serde(default)]
    pub client: ClientConfig,

    /// Wire transport and server
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Service names used by SRV probing
    #[serde(default)]
    pub services: ServiceCatalog,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. resolv.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
            Self::from_file(LOCAL_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides)?;
        config.normalize_servers();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) -> Result<(), ConfigError> {
        if let Some(client) = overrides.client {
            self.client = client;
        }
        if let Some(transport) = overrides.transport {
            self.transport = transport;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(path) = overrides.service_file {
            self.services = ServiceCatalog::from_file(&path)?;
        }
        Ok(())
    }

    /// Fill in default ports for servers given without one
    fn normalize_servers(&mut self) {
        match &mut self.transport {
            TransportConfig::Udp(c) => c.server = join_host_port(&c.server, DEFAULT_DNS_PORT),
            TransportConfig::Tcp(c) => c.server = join_host_port(&c.server, DEFAULT_DNS_PORT),
            TransportConfig::Tls(c) => c.server = join_host_port(&c.server, DEFAULT_DOT_PORT),
            TransportConfig::Https(_) => {}
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        self.transport.validate()?;
        if self.services.is_empty() {
            return Err(ConfigError::Validation(
                "service catalog must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub client: Option<ClientConfig>,
    pub transport: Option<TransportConfig>,
    pub log_level: Option<String>,
    pub service_file: Option<String>,
}
