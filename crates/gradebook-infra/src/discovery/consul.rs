//! Consul agent HTTP API client.
//!
//! Implements `DiscoveryRegistry` from `gradebook-core` against the local
//! Consul agent: services register and deregister through
//! `/v1/agent/service/*`, and peers find healthy instances through
//! `/v1/health/service/{name}?passing=true`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gradebook_core::discovery::DiscoveryRegistry;
use gradebook_types::config::DiscoveryConfig;
use gradebook_types::discovery::{HealthCheck, ServiceInstance};
use gradebook_types::error::DiscoveryError;

/// Header carrying the Consul ACL token.
const TOKEN_HEADER: &str = "X-Consul-Token";

/// How long a failing instance stays registered before Consul reaps it.
const DEREGISTER_CRITICAL_AFTER: &str = "1m";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterBody<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    name: &'a str,
    tags: &'a [String],
    address: &'a str,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    check: Option<CheckBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CheckBody {
    #[serde(rename = "HTTP")]
    http: String,
    interval: String,
    deregister_critical_service_after: String,
}

impl From<&HealthCheck> for CheckBody {
    fn from(check: &HealthCheck) -> Self {
        Self {
            http: check.url.clone(),
            interval: format!("{}s", check.interval_secs),
            deregister_critical_service_after: DEREGISTER_CRITICAL_AFTER.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthEntry {
    node: HealthNode,
    service: HealthService,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthNode {
    #[serde(default)]
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthService {
    #[serde(rename = "ID")]
    id: String,
    service: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    address: String,
    port: u16,
}

impl HealthEntry {
    fn into_instance(self) -> ServiceInstance {
        // An empty service address means "same as the node".
        let address = if self.service.address.is_empty() {
            self.node.address
        } else {
            self.service.address
        };
        ServiceInstance {
            id: self.service.id,
            name: self.service.service,
            address,
            port: self.service.port,
            tags: self.service.tags.unwrap_or_default(),
            health_check: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Consul implementation of `DiscoveryRegistry`.
#[derive(Clone)]
pub struct ConsulDiscoveryClient {
    endpoint: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ConsulDiscoveryClient {
    /// Build a client from the `[discovery]` config section.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gradebook/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DiscoveryError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            http,
        })
    }

    /// Agent base URL, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, DiscoveryError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| DiscoveryError::Unreachable {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(response)
    }
}

impl DiscoveryRegistry for ConsulDiscoveryClient {
    async fn register(&self, instance: &ServiceInstance) -> Result<(), DiscoveryError> {
        let body = RegisterBody {
            id: &instance.id,
            name: &instance.name,
            tags: &instance.tags,
            address: &instance.address,
            port: instance.port,
            check: instance.health_check.as_ref().map(CheckBody::from),
        };
        debug!(endpoint = %self.endpoint, id = %instance.id, "registering service");

        let url = format!("{}/v1/agent/service/register", self.endpoint);
        self.send(self.http.put(&url).json(&body)).await?;
        Ok(())
    }

    async fn deregister(&self, instance_id: &str) -> Result<(), DiscoveryError> {
        debug!(endpoint = %self.endpoint, id = instance_id, "deregistering service");
        let url = format!("{}/v1/agent/service/deregister/{instance_id}", self.endpoint);
        self.send(self.http.put(&url)).await?;
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Vec<ServiceInstance>, DiscoveryError> {
        let url = format!("{}/v1/health/service/{name}", self.endpoint);
        let response = self
            .send(self.http.get(&url).query(&[("passing", "true")]))
            .await?;

        let entries: Vec<HealthEntry> = response
            .json()
            .await
            .map_err(|e| DiscoveryError::InvalidResponse(e.to_string()))?;
        Ok(entries.into_iter().map(HealthEntry::into_instance).collect())
    }
}
