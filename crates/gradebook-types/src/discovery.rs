use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;

/// A running service instance as known to the discovery registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Unique id within the registry.
    pub id: String,
    /// Logical name peers look the service up by.
    pub name: String,
    /// Address peers connect to.
    pub address: String,
    pub port: u16,
    /// Component groups the instance serves.
    pub tags: Vec<String>,
    /// Health check the registry should run, if any.
    pub health_check: Option<HealthCheck>,
}

/// HTTP health check polled by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub url: String,
    pub interval_secs: u64,
}

impl ServiceInstance {
    /// Describe the instance a service config will register.
    ///
    /// `port` is the port actually bound, which differs from the configured one
    /// when the config asks for port 0.
    pub fn from_config(config: &ServiceConfig, port: u16, health_check_interval_secs: u64) -> Self {
        let address = config.advertised_address().to_string();
        let health_check = config.has_component("common").then(|| HealthCheck {
            url: format!("http://{address}:{port}/health"),
            interval_secs: health_check_interval_secs,
        });

        Self {
            id: config.instance_id_for(port),
            name: config.name.clone(),
            address,
            port,
            tags: config.components.clone(),
            health_check,
        }
    }

    /// Base URL for calling the instance.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}
