//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! // Basic structured logging only
//! gradebook_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // With OpenTelemetry export to stdout (for local development)
//! gradebook_observe::tracing_setup::init_tracing("info", true).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use std::sync::OnceLock;

/// Environment variable that turns on the OpenTelemetry bridge.
pub const OTEL_ENV: &str = "GRADEBOOK_OTEL";

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// True when `GRADEBOOK_OTEL` is set to `1` or `true`.
pub fn otel_requested() -> bool {
    std::env::var(OTEL_ENV)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Log targets of the workspace crates: the `gradebook` binary and the
/// libraries it links.
const WORKSPACE_TARGETS: [&str; 4] = [
    "gradebook",
    "gradebook_core",
    "gradebook_infra",
    "gradebook_observe",
];

/// Default filter directive for the `-q`/`-v` flags.
///
/// A single `-v` raises every workspace crate to debug while dependencies stay
/// at info.
pub fn verbosity_directive(verbose: u8, quiet: bool) -> String {
    match verbose {
        0 if quiet => "error".to_string(),
        0 => "warn".to_string(),
        1 => std::iter::once("info".to_string())
            .chain(WORKSPACE_TARGETS.iter().map(|t| format!("{t}=debug")))
            .collect::<Vec<_>>()
            .join(","),
        _ => "trace".to_string(),
    }
}

/// Build the filter: `RUST_LOG` wins when set, otherwise `default_directive`.
fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a structured `fmt` layer writing to stderr, so log lines
///   never interleave with the terminal controller's stdout.
/// - When `enable_otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter (suitable for local development;
///   swap the exporter for OTLP in production).
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(
    default_directive: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let env_filter = build_filter(default_directive);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("gradebook");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    tracing::debug!(otel = enable_otel, "tracing initialized");
    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Call this before process exit to ensure all buffered spans are exported.
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0, true), "error");
        assert_eq!(verbosity_directive(0, false), "warn");
        assert_eq!(verbosity_directive(3, true), "trace");

        let verbose = verbosity_directive(1, false);
        assert!(verbose.starts_with("info,"));
        for target in ["gradebook_core", "gradebook_infra", "gradebook_observe"] {
            assert!(verbose.contains(&format!("{target}=debug")), "{verbose}");
        }
        assert!(EnvFilter::try_new(&verbose).is_ok());
    }

    #[test]
    fn test_shutdown_without_init_is_noop() {
        shutdown_tracing();
    }

    #[test]
    fn test_second_init_fails() {
        // The first call may race with other tests in this binary; only the
        // second call is guaranteed to see a subscriber already set.
        let _ = init_tracing("warn", false);
        assert!(init_tracing("warn", false).is_err());
    }
}
