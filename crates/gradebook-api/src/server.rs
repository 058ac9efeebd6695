//! Grade service bootstrap.
//!
//! [`start`] validates the config, binds the listener, builds the router and
//! registers the instance with the discovery registry. Each step is fatal on
//! failure. [`RunningService::serve`] runs until the shutdown future resolves
//! and then withdraws the registration.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use gradebook_core::discovery::{DiscoveryRegistry, Registration};
use gradebook_types::config::AppConfig;
use gradebook_types::discovery::ServiceInstance;
use gradebook_types::error::{ConfigError, DiscoveryError};

use crate::http::handlers::health::ServiceInfo;
use crate::http::router::build_router;
use crate::state::AppState;

/// Why the service could not start.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("service registration failed: {0}")]
    Registration(#[from] DiscoveryError),
}

/// A bound and registered service that has not started serving yet.
pub struct RunningService<R: DiscoveryRegistry> {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
    registration: Registration<R>,
}

/// Bring the grade service up.
///
/// The registry is contacted last, so a registration failure leaves nothing
/// behind: the listener is dropped with the error.
pub async fn start<R: DiscoveryRegistry>(
    config: &AppConfig,
    state: AppState,
    registry: R,
) -> Result<RunningService<R>, StartupError> {
    config.validate()?;
    let service = &config.service;

    let addr = format!("{}:{}", service.host, service.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| StartupError::Bind { addr, source })?;

    let instance = ServiceInstance::from_config(
        service,
        local_addr.port(),
        config.discovery.health_check_interval_secs,
    );
    let info = ServiceInfo {
        name: service.name.clone(),
        instance_id: instance.id.clone(),
        components: service.components.clone(),
        version: env!("CARGO_PKG_VERSION"),
    };
    let router = build_router(state, service, info);

    let registration = Registration::register(registry, instance).await?;

    Ok(RunningService {
        listener,
        router,
        local_addr,
        registration,
    })
}

impl<R: DiscoveryRegistry> RunningService<R> {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn instance(&self) -> &ServiceInstance {
        self.registration.instance()
    }

    /// Serve until `shutdown` resolves, then deregister.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(addr = %self.local_addr, id = %self.instance().id, "grade service listening");
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await;
        self.registration.release().await;
        result
    }
}
