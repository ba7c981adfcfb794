//! OpenTelemetry setup for the CLI.
//!
//! [`init_tracer_provider`] reads the `OTEL_*` environment (see [`crate::env`])
//! and builds a tracer provider with the requested exporters, registering it
//! globally. The returned [`TracerProviderHandle`] hands out tracers and owns
//! the deadline-bounded shutdown.

use std::borrow::Cow;
use std::time::Duration;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::error::OTelSdkError;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAMESPACE, SERVICE_VERSION};
use thiserror::Error;
use tracing::{info, warn};

use crate::env;

pub mod attrs;
mod span;

pub use span::{new_metadata, SpanScope};

const DEFAULT_SERVICE_NAME: &str = "crypto-broker-cli";
const DEFAULT_SERVICE_VERSION: &str = "unknown service version";
const DEFAULT_TRACES_EXPORTER: &str = "console";
const SERVICE_NAMESPACE_VALUE: &str = "crypto-broker";

const KEY_EXPORTER_OTLP: &str = "otlp";
const KEY_EXPORTER_CONSOLE: &str = "console";

/// Deadline for flushing buffered spans on shutdown.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);

/// Errors from configuring or tearing down telemetry.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The OTLP exporter was requested without a collector endpoint.
    #[error("{0} is not set")]
    EndpointNotSet(&'static str),

    /// Building the OTLP span exporter failed.
    #[error("failed to create OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Shutting the provider down did not finish within the deadline.
    #[error("tracer provider shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),

    /// The provider reported a shutdown failure.
    #[error("tracer provider shutdown failed: {0}")]
    Shutdown(#[from] OTelSdkError),
}

/// Handle to the configured tracer provider.
///
/// Clones share one provider. Shutting down through any clone shuts the
/// provider down for all of them; repeated shutdowns are no-ops.
#[derive(Clone, Debug)]
pub struct TracerProviderHandle {
    provider: SdkTracerProvider,
}

impl TracerProviderHandle {
    /// Returns a tracer with the given instrumentation scope name.
    pub fn tracer(&self, name: impl Into<Cow<'static, str>>) -> SdkTracer {
        self.provider.tracer(name)
    }

    /// Shuts the provider down, waiting at most 5 seconds for buffered spans
    /// to flush.
    pub async fn shutdown(&self) -> Result<(), TelemetryError> {
        let provider = self.provider.clone();
        let result = tokio::time::timeout(
            SHUTDOWN_DEADLINE,
            tokio::task::spawn_blocking(move || provider.shutdown()),
        )
        .await;

        match result {
            Err(_) => Err(TelemetryError::ShutdownTimeout(SHUTDOWN_DEADLINE)),
            Ok(Err(join_error)) => Err(TelemetryError::Shutdown(OTelSdkError::InternalFailure(
                join_error.to_string(),
            ))),
            Ok(Ok(Err(OTelSdkError::AlreadyShutdown))) => Ok(()),
            Ok(Ok(Err(err))) => Err(TelemetryError::Shutdown(err)),
            Ok(Ok(Ok(()))) => Ok(()),
        }
    }
}

/// Creates a tracer provider from the `OTEL_*` environment and registers it
/// globally.
///
/// `OTEL_TRACES_EXPORTER` selects the exporters (default `console`). The
/// `otlp` exporter requires `OTEL_EXPORTER_OTLP_ENDPOINT`; requesting it
/// without one is an error. When no recognized exporter is requested the
/// provider is built without any, so spans are created but exported nowhere.
///
/// An empty `service_name` or `service_version` falls back to
/// `OTEL_SERVICE_NAME` / `OTEL_SERVICE_VERSION`, then to built-in defaults.
pub fn init_tracer_provider(
    service_name: &str,
    service_version: &str,
) -> Result<TracerProviderHandle, TelemetryError> {
    let (service_name, service_version) = resolve_identity(service_name, service_version);

    let requested = env_nonempty(env::OTEL_TRACES_EXPORTER)
        .unwrap_or_else(|| DEFAULT_TRACES_EXPORTER.to_string());
    let exporter_names: Vec<String> = requested
        .to_lowercase()
        .split(',')
        .map(|name| name.trim().to_string())
        .collect();

    let mut builder = SdkTracerProvider::builder();
    let mut has_exporter = false;

    if exporter_names.iter().any(|name| name == KEY_EXPORTER_OTLP) {
        let endpoint = env_nonempty(env::OTEL_EXPORTER_OTLP_ENDPOINT)
            .ok_or_else(|| TelemetryError::EndpointNotSet(env::OTEL_EXPORTER_OTLP_ENDPOINT))?;
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .build()?;
        builder = builder.with_batch_exporter(exporter);
        has_exporter = true;
        info!(endpoint = %endpoint, "OTLP exporter configured");
    }

    if exporter_names.iter().any(|name| name == KEY_EXPORTER_CONSOLE) {
        builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
        has_exporter = true;
        info!("Console exporter configured");
    }

    if !has_exporter {
        info!(
            requested_exporters = %requested,
            "No valid exporters configured, using no-op tracer provider"
        );
        let provider = builder.build();
        global::set_tracer_provider(provider.clone());
        return Ok(TracerProviderHandle { provider });
    }

    let resource = Resource::builder()
        .with_service_name(service_name.clone())
        .with_attributes([
            KeyValue::new(SERVICE_VERSION, service_version.clone()),
            KeyValue::new(SERVICE_NAMESPACE, SERVICE_NAMESPACE_VALUE),
        ])
        .build();

    let (sampler, sampler_name) = resolve_sampler();

    let provider = builder
        .with_resource(resource)
        .with_sampler(sampler)
        .build();
    global::set_tracer_provider(provider.clone());

    info!(
        service_name = %service_name,
        service_version = %service_version,
        exporters = %requested,
        sampler = %sampler_name,
        "OpenTelemetry tracer provider initialized"
    );

    Ok(TracerProviderHandle { provider })
}

fn resolve_identity(service_name: &str, service_version: &str) -> (String, String) {
    let name = if service_name.is_empty() {
        env_nonempty(env::OTEL_SERVICE_NAME).unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string())
    } else {
        service_name.to_string()
    };
    let version = if service_version.is_empty() {
        env_nonempty(env::OTEL_SERVICE_VERSION)
            .unwrap_or_else(|| DEFAULT_SERVICE_VERSION.to_string())
    } else {
        service_version.to_string()
    };
    (name, version)
}

/// Resolves the sampler from `OTEL_TRACES_SAMPLER`, falling back to
/// `always_on` with a warning when the value is not recognized.
fn resolve_sampler() -> (Sampler, String) {
    let name = env_nonempty(env::OTEL_TRACES_SAMPLER).unwrap_or_else(|| "always_on".to_string());
    let sampler = match name.as_str() {
        "always_on" | "always" => Sampler::AlwaysOn,
        "always_off" | "never" => Sampler::AlwaysOff,
        "traceidratio" | "ratio" => Sampler::TraceIdRatioBased(sampler_ratio_from_env()),
        "parentbased_always_on" => Sampler::ParentBased(Box::new(Sampler::AlwaysOn)),
        "parentbased_always_off" => Sampler::ParentBased(Box::new(Sampler::AlwaysOff)),
        "parentbased_traceidratio" => {
            Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(sampler_ratio_from_env())))
        }
        other => {
            warn!(sampler = other, "Unknown OTEL_TRACES_SAMPLER value, using always_on");
            Sampler::AlwaysOn
        }
    };
    (sampler, name)
}

/// Ratio for ratio-based samplers. Values that do not parse or fall outside
/// `[0.0, 1.0]` sample everything.
fn sampler_ratio_from_env() -> f64 {
    env_nonempty(env::OTEL_TRACES_SAMPLER_ARG)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|ratio| (0.0..=1.0).contains(ratio))
        .unwrap_or(1.0)
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
