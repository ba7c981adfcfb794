//! `health` command: checks the broker server status.

use std::time::Instant;

use crypto_broker_client::{proto, Library, RetryPolicy};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::SdkTracer;
use tracing::{debug, info};

use crate::error::Error;
use crate::runner::{self, LoopSpec};
use crate::telemetry::attrs;
use crate::telemetry::SpanScope;

pub async fn execute(delay_ms: i64) -> Result<(), Error> {
    super::with_telemetry(|telemetry, watch| async move {
        let library = Library::connect_with_retry(RetryPolicy::default()).await?;
        let tracer = telemetry.tracer(super::SERVICE_NAME);

        info!("Checking broker server health");

        let result = runner::run(LoopSpec::from_flag(delay_ms), &watch, || {
            health_once(&library, &tracer)
        })
        .await;

        info!("Closing crypto broker library connection");
        library.close();

        result
    })
    .await
}

async fn health_once(library: &Library, tracer: &SdkTracer) -> Result<(), Error> {
    let mut scope = SpanScope::open(
        tracer,
        "CLI.Health",
        vec![KeyValue::new(attrs::RPC_METHOD, "Health")],
    );

    let request = proto::HealthRequest {
        metadata: Some(scope.inject(None)),
    };

    let started = Instant::now();
    let response = match library.health(request).await {
        Ok(response) => response,
        Err(err) => {
            scope.record_failure(&err);
            return Err(err.into());
        }
    };
    let elapsed = started.elapsed();

    let rendered = match serde_json::to_string_pretty(&response) {
        Ok(rendered) => rendered,
        Err(err) => {
            scope.record_failure(&err);
            return Err(err.into());
        }
    };

    scope.succeed();
    debug!("Health check completed successfully");

    info!("Health check response:\n{rendered}");
    info!(elapsed_us = elapsed.as_micros(), "Health check finished");

    Ok(())
}
