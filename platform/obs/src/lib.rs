//! Tracing setup shared by every binary in the workspace.
//!
//! Logs go to stderr so CLI output on stdout stays clean. When an OTLP
//! endpoint is configured, spans are also exported over HTTP.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    /// Overrides `RUST_LOG` when set.
    pub env_filter: Option<String>,
    /// Overrides `OTLP_ENDPOINT` when set.
    pub otlp_endpoint: Option<String>,
    pub ansi: bool,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "hr-dashboard",
            env_filter: None,
            otlp_endpoint: None,
            ansi: true,
        }
    }
}

impl ObsConfig {
    /// Quieter defaults for one-shot CLI commands.
    pub fn cli() -> Self {
        Self {
            env_filter: Some(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())),
            ..Self::default()
        }
    }

    fn filter(&self) -> String {
        resolve_filter(self.env_filter.clone(), std::env::var("RUST_LOG").ok())
    }
}

fn resolve_filter(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the subscriber once per process; later calls are no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(config.filter())?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(config.ansi)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    let otlp_endpoint = config
        .otlp_endpoint
        .or_else(|| std::env::var("OTLP_ENDPOINT").ok())
        .filter(|endpoint| !endpoint.trim().is_empty());

    if let Some(endpoint) = otlp_endpoint {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name)
            .build();

        let provider = sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();
        let tracer = provider.tracer(config.service_name);

        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}
