//! `benchmark` command: runs server-side cryptographic benchmarks.

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

        info!("Running server-side benchmarks");

        let result = runner::run(LoopSpec::from_flag(delay_ms), &watch, || {
            benchmark_once(&library, &tracer)
        })
        .await;

        info!("Closing crypto broker library connection");
        library.close();

        result
    })
    .await
}

async fn benchmark_once(library: &Library, tracer: &SdkTracer) -> Result<(), Error> {
    let mut scope = SpanScope::open(
        tracer,
        "CLI.Benchmark",
        vec![KeyValue::new(attrs::RPC_METHOD, "Benchmark")],
    );

    let request = proto::BenchmarkRequest {
        metadata: Some(scope.inject(None)),
    };

    let started = Instant::now();
    let response = match library.benchmark(request).await {
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

    scope.set_attributes([KeyValue::new(
        attrs::CRYPTO_BENCHMARK_RESULTS_SIZE,
        rendered.len() as i64,
    )]);
    scope.succeed();
    debug!("Benchmark operation completed successfully");

    info!("Benchmark results:\n{rendered}");
    info!(
        elapsed_us = elapsed.as_micros(),
        "Benchmark execution finished"
    );

    Ok(())
}
