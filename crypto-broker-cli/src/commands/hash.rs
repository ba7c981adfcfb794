//! `hash` command: sends a hashing request to the crypto broker and
//! displays the response.

use std::time::Instant;

use crypto_broker_client::{proto, Library, RetryPolicy};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::SdkTracer;
use tracing::{debug, info};

use crate::error::Error;
use crate::runner::{self, LoopSpec};
use crate::telemetry::attrs;
use crate::telemetry::{new_metadata, SpanScope};

pub async fn execute(input: String, profile: String, delay_ms: i64) -> Result<(), Error> {
    super::with_telemetry(|telemetry, watch| async move {
        let library = Library::connect_with_retry(RetryPolicy::default()).await?;
        let tracer = telemetry.tracer(super::SERVICE_NAME);

        info!(input = %input, profile = %profile, "Hashing input");

        // One envelope for the whole invocation; every loop iteration
        // reuses its id and creation time.
        let envelope = new_metadata();
        let input = input.into_bytes();

        let result = runner::run(LoopSpec::from_flag(delay_ms), &watch, || {
            hash_once(
                &library,
                &tracer,
                envelope.clone(),
                input.clone(),
                profile.clone(),
            )
        })
        .await;

        info!("Closing crypto broker library connection");
        library.close();

        result
    })
    .await
}

async fn hash_once(
    library: &Library,
    tracer: &SdkTracer,
    envelope: proto::Metadata,
    input: Vec<u8>,
    profile: String,
) -> Result<(), Error> {
    let mut scope = SpanScope::open(
        tracer,
        "CLI.Hash",
        vec![
            KeyValue::new(attrs::RPC_METHOD, "Hash"),
            KeyValue::new(attrs::CRYPTO_PROFILE, profile.clone()),
            KeyValue::new(attrs::CRYPTO_INPUT_SIZE, input.len() as i64),
        ],
    );

    let request = proto::HashRequest {
        input,
        profile,
        metadata: Some(scope.inject(Some(envelope))),
    };

    let started = Instant::now();
    let response = match library.hash(request).await {
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

    scope.set_attributes([
        KeyValue::new(attrs::CRYPTO_HASH_ALGORITHM, response.hash_algorithm.clone()),
        KeyValue::new(
            attrs::CRYPTO_HASH_OUTPUT_SIZE,
            response.hash_value.len() as i64,
        ),
    ]);
    scope.succeed();
    debug!("Hash operation completed successfully");

    info!("Hashed response:\n{rendered}");
    info!(elapsed_us = elapsed.as_micros(), "Data hashing finished");

    Ok(())
}
