//! `gradebook serve`: run the grade service.

use std::future::Future;

use anyhow::Result;
use console::style;

use gradebook_infra::discovery::consul::ConsulDiscoveryClient;
use gradebook_types::config::AppConfig;

use crate::server;
use crate::state::AppState;

/// Command-line values that take precedence over `config.toml`.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub registry: Option<String>,
    pub name: Option<String>,
}

impl ServeOverrides {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.service.host = host;
        }
        if let Some(port) = self.port {
            config.service.port = port;
        }
        if let Some(registry) = self.registry {
            config.discovery.endpoint = registry;
        }
        if let Some(name) = self.name {
            config.service.name = name;
        }
    }
}

/// Start, register and serve until `shutdown` resolves.
///
/// Any startup failure is returned, so the process exits non-zero.
pub async fn serve<F>(
    state: AppState,
    mut config: AppConfig,
    overrides: ServeOverrides,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    overrides.apply(&mut config);
    let registry = ConsulDiscoveryClient::new(&config.discovery)?;
    let registry_endpoint = registry.endpoint().to_string();
    let running = server::start(&config, state, registry).await?;

    let instance = running.instance();
    println!();
    println!(
        "  {} {} listening on {}",
        style("⚡").bold(),
        style(&instance.name).bold(),
        style(format!("http://{}", running.local_addr())).cyan()
    );
    println!(
        "  {} registered as {} at {}",
        style("✓").green(),
        style(&instance.id).bold(),
        style(&registry_endpoint).dim()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    running.serve(shutdown).await?;

    println!("\n  Server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = AppConfig::default();
        ServeOverrides {
            port: Some(9100),
            registry: Some("http://consul:8500".to_string()),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.host, "127.0.0.1");
        assert_eq!(config.service.name, "grade-service");
        assert_eq!(config.discovery.endpoint, "http://consul:8500");
    }

    #[tokio::test]
    async fn test_serve_fails_when_registry_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path()).await.unwrap();
        let overrides = ServeOverrides {
            port: Some(0),
            registry: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        };

        let err = serve(state, AppConfig::default(), overrides, async {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("registration failed"));
    }
}
