//! Discovery registry port.
//!
//! The grade service announces itself to an external registry at startup so
//! peers can find it by name, and withdraws the announcement on shutdown.
//! The HTTP client for the registry lives in gradebook-infra.

use gradebook_types::discovery::ServiceInstance;
use gradebook_types::error::DiscoveryError;

/// Operations the service needs from a discovery registry.
pub trait DiscoveryRegistry: Send + Sync {
    /// Announce an instance. Any failure is reported; callers decide whether
    /// it is fatal.
    fn register(
        &self,
        instance: &ServiceInstance,
    ) -> impl std::future::Future<Output = Result<(), DiscoveryError>> + Send;

    /// Withdraw an instance by id.
    fn deregister(
        &self,
        instance_id: &str,
    ) -> impl std::future::Future<Output = Result<(), DiscoveryError>> + Send;

    /// Healthy instances registered under `name`.
    fn lookup(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ServiceInstance>, DiscoveryError>> + Send;
}

/// An instance currently announced to a registry.
///
/// Created only by a successful [`Registration::register`]; consumed by
/// [`Registration::release`] on shutdown.
pub struct Registration<R> {
    registry: R,
    instance: ServiceInstance,
}

impl<R: DiscoveryRegistry> Registration<R> {
    /// Register `instance`, returning the error untouched on failure.
    pub async fn register(registry: R, instance: ServiceInstance) -> Result<Self, DiscoveryError> {
        registry.register(&instance).await?;
        tracing::info!(
            id = %instance.id,
            name = %instance.name,
            address = %instance.address,
            port = instance.port,
            "registered with discovery registry"
        );
        Ok(Self { registry, instance })
    }

    pub fn instance(&self) -> &ServiceInstance {
        &self.instance
    }

    /// Deregister the instance. A failure is logged and otherwise ignored:
    /// the registry's health check will expire the entry.
    pub async fn release(self) {
        match self.registry.deregister(&self.instance.id).await {
            Ok(()) => tracing::info!(id = %self.instance.id, "deregistered from discovery registry"),
            Err(e) => tracing::warn!(
                id = %self.instance.id,
                error = %e,
                "failed to deregister from discovery registry"
            ),
        }
    }
}
