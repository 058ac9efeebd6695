//! Configuration types for Gradebook.
//!
//! `AppConfig` represents the top-level `config.toml` that controls how the
//! grade service binds, which component groups it mounts, and where the
//! discovery registry lives. All fields have defaults so an empty file (or no
//! file at all) yields a runnable local configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Route groups the grade service knows how to mount.
pub const KNOWN_COMPONENTS: [&str; 2] = ["grades", "common"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl AppConfig {
    /// Check the invariants startup relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.discovery.validate()
    }
}

/// How the grade service presents itself on the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name peers use to look the service up in the registry.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Address registered with discovery. Defaults to `host`.
    #[serde(default)]
    pub advertise_address: Option<String>,

    /// Component groups to mount (and advertise as registry tags).
    #[serde(default = "default_components")]
    pub components: Vec<String>,

    /// Explicit registry instance id. Defaults to `<name>-<address>-<port>`.
    #[serde(default)]
    pub instance_id: Option<String>,
}

fn default_service_name() -> String {
    "grade-service".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_components() -> Vec<String> {
    KNOWN_COMPONENTS.iter().map(|c| c.to_string()).collect()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            host: default_host(),
            port: default_port(),
            advertise_address: None,
            components: default_components(),
            instance_id: None,
        }
    }
}

impl ServiceConfig {
    /// Address peers should use to reach this instance.
    pub fn advertised_address(&self) -> &str {
        self.advertise_address.as_deref().unwrap_or(&self.host)
    }

    /// Registry instance id for an instance bound to `port`.
    pub fn instance_id_for(&self, port: u16) -> String {
        self.instance_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}-{}", self.name, self.advertised_address(), port))
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("service.name must not be empty".to_string()));
        }
        if self.components.is_empty() {
            return Err(ConfigError::Invalid(
                "service.components must name at least one component group".to_string(),
            ));
        }
        if let Some(unknown) = self
            .components
            .iter()
            .find(|c| !KNOWN_COMPONENTS.contains(&c.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "unknown component group '{unknown}' (known: {})",
                KNOWN_COMPONENTS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Where the discovery registry lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Base URL of the registry agent.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional ACL token.
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How often the registry should poll `/health`.
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8500".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_health_check_interval_secs() -> u64 {
    10
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            timeout_secs: default_timeout_secs(),
            health_check_interval_secs: default_health_check_interval_secs(),
        }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "discovery.endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "discovery.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
