//! Environment variables read by the telemetry setup.

pub use opentelemetry_otlp::OTEL_EXPORTER_OTLP_ENDPOINT;

/// Comma-separated list of trace exporters to configure (`otlp`, `console`).
pub const OTEL_TRACES_EXPORTER: &str = "OTEL_TRACES_EXPORTER";
/// Sampler to use for newly created spans, e.g. `always_on` or `traceidratio`.
pub const OTEL_TRACES_SAMPLER: &str = "OTEL_TRACES_SAMPLER";
/// Argument for ratio-based samplers, a number in `[0.0, 1.0]`.
pub const OTEL_TRACES_SAMPLER_ARG: &str = "OTEL_TRACES_SAMPLER_ARG";
/// Service name reported in the trace resource when the binary does not set one.
pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
/// Service version reported in the trace resource when the binary does not set one.
pub const OTEL_SERVICE_VERSION: &str = "OTEL_SERVICE_VERSION";
