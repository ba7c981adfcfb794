//! Span lifecycle helper for command invocations.

use chrono::{SecondsFormat, Utc};
use opentelemetry::trace::{Span as _, SpanKind, Status, Tracer as _};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::{SdkTracer, Span};
use uuid::Uuid;

use crypto_broker_client::proto;

/// Fresh request envelope with a unique id and the current UTC time.
pub fn new_metadata() -> proto::Metadata {
    proto::Metadata {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        trace_context: None,
    }
}

/// One span covering one broker call.
///
/// The span starts when the scope is opened and ends when the scope is
/// dropped; status stays unset unless an outcome is recorded.
pub struct SpanScope {
    span: Span,
}

impl SpanScope {
    /// Opens a client span with the given name and initial attributes.
    pub fn open(tracer: &SdkTracer, name: &'static str, attributes: Vec<KeyValue>) -> Self {
        let span = tracer
            .span_builder(name)
            .with_kind(SpanKind::Client)
            .with_attributes(attributes)
            .start(tracer);
        Self { span }
    }

    /// Stamps `metadata` (or a fresh envelope) with this span's trace context.
    ///
    /// Identifiers use their canonical string forms: 32 hex characters for
    /// the trace id, 16 for the span id, 2 for the flags. Any trace context
    /// already present is overwritten; id and creation time are preserved.
    pub fn inject(&self, metadata: Option<proto::Metadata>) -> proto::Metadata {
        let context = self.span.span_context();
        let mut metadata = metadata.unwrap_or_else(new_metadata);
        metadata.trace_context = Some(proto::TraceContext {
            trace_id: context.trace_id().to_string(),
            span_id: context.span_id().to_string(),
            trace_flags: format!("{:02x}", context.trace_flags()),
            trace_state: context.trace_state().header(),
        });
        metadata
    }

    /// Adds attributes describing the call's outcome.
    pub fn set_attributes(&mut self, attributes: impl IntoIterator<Item = KeyValue>) {
        self.span.set_attributes(attributes);
    }

    /// Marks the call successful.
    pub fn succeed(&mut self) {
        self.span.set_status(Status::Ok);
    }

    /// Records the error on the span and marks the call failed.
    pub fn record_failure(&mut self, error: &dyn std::error::Error) {
        self.span.record_error(error);
        self.span.set_status(Status::error(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};

    fn recording_tracer() -> (SdkTracerProvider, InMemorySpanExporter, SdkTracer) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("test");
        (provider, exporter, tracer)
    }

    #[test]
    fn new_metadata_is_unique_and_timestamped() {
        let first = new_metadata();
        let second = new_metadata();

        assert_ne!(first.id, second.id);
        assert!(first.created_at.contains('T'));
        assert!(first.created_at.ends_with('Z'));
        assert!(first.trace_context.is_none());
    }

    #[test]
    fn injected_context_matches_the_exported_span() {
        let (_provider, exporter, tracer) = recording_tracer();

        let metadata = {
            let scope = SpanScope::open(&tracer, "CLI.Test", vec![]);
            scope.inject(None)
        };

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        let exported = &spans[0];

        let context = metadata.trace_context.expect("trace context injected");
        assert_eq!(context.trace_id, exported.span_context.trace_id().to_string());
        assert_eq!(context.span_id, exported.span_context.span_id().to_string());
        assert_eq!(context.trace_id.len(), 32);
        assert_eq!(context.span_id.len(), 16);
        assert_eq!(context.trace_flags, "01");
    }

    #[test]
    fn caller_supplied_envelope_keeps_its_identity() {
        let (_provider, _exporter, tracer) = recording_tracer();

        let envelope = new_metadata();
        let scope = SpanScope::open(&tracer, "CLI.Test", vec![]);
        let stamped = scope.inject(Some(envelope.clone()));

        assert_eq!(stamped.id, envelope.id);
        assert_eq!(stamped.created_at, envelope.created_at);
        assert!(stamped.trace_context.is_some());
    }

    #[test]
    fn stale_trace_context_is_overwritten() {
        let (_provider, _exporter, tracer) = recording_tracer();

        let mut envelope = new_metadata();
        envelope.trace_context = Some(proto::TraceContext {
            trace_id: "0".repeat(32),
            span_id: "0".repeat(16),
            trace_flags: "00".to_string(),
            trace_state: String::new(),
        });

        let scope = SpanScope::open(&tracer, "CLI.Test", vec![]);
        let stamped = scope.inject(Some(envelope));

        let context = stamped.trace_context.unwrap();
        assert_ne!(context.trace_id, "0".repeat(32));
        assert_ne!(context.span_id, "0".repeat(16));
    }

    #[test]
    fn outcome_attributes_and_status_are_exported() {
        let (_provider, exporter, tracer) = recording_tracer();

        {
            let mut scope = SpanScope::open(
                &tracer,
                "CLI.Test",
                vec![KeyValue::new("crypto.profile", "Default")],
            );
            scope.set_attributes([KeyValue::new("crypto.hash_algorithm", "SHA-256")]);
            scope.succeed();
        }

        let spans = exporter.get_finished_spans().unwrap();
        let exported = &spans[0];
        assert_eq!(exported.span_kind, SpanKind::Client);
        assert_eq!(exported.status, Status::Ok);
        assert!(exported
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "crypto.profile" && kv.value.as_str() == "Default"));
        assert!(exported
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "crypto.hash_algorithm" && kv.value.as_str() == "SHA-256"));
    }

    #[test]
    fn failures_set_an_error_status() {
        let (_provider, exporter, tracer) = recording_tracer();

        {
            let mut scope = SpanScope::open(&tracer, "CLI.Test", vec![]);
            scope.record_failure(&std::io::Error::other("connection refused"));
        }

        let spans = exporter.get_finished_spans().unwrap();
        match &spans[0].status {
            Status::Error { description } => assert_eq!(description.as_ref(), "connection refused"),
            other => panic!("expected error status, got {other:?}"),
        }
    }
}
