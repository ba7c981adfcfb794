//! CLI command implementations.
//!
//! Every command follows the same lifecycle: initialize the tracer
//! provider, register signal handling, connect to the broker, run the
//! command body once or in a fixed-delay loop, close the connection,
//! and shut the provider down.

use std::future::Future;

use tracing::error;

use crate::error::Error;
use crate::shutdown::{self, ShutdownWatch};
use crate::telemetry::{self, TracerProviderHandle};

pub mod benchmark;
pub mod fake_endpoint;
pub mod hash;
pub mod health;
pub mod sign;

/// Service identity reported in the trace resource, also used as the
/// instrumentation scope name for command tracers.
const SERVICE_NAME: &str = "crypto-broker-cli";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs a command body with tracing and signal handling set up around it.
///
/// The tracer provider is shut down before this returns, whether the body
/// succeeded or not. Shutdown failures are logged rather than returned so
/// they never mask the command result.
async fn with_telemetry<F, Fut>(run: F) -> Result<(), Error>
where
    F: FnOnce(TracerProviderHandle, ShutdownWatch) -> Fut,
    Fut: Future<Output = Result<(), Error>>,
{
    let telemetry = telemetry::init_tracer_provider(SERVICE_NAME, SERVICE_VERSION)?;

    let (trigger, watch) = shutdown::channel();
    tokio::spawn(shutdown::handle_signals(trigger, telemetry.clone()));

    let result = run(telemetry.clone(), watch).await;

    if let Err(err) = telemetry.shutdown().await {
        error!(error = %err, "Failed to shutdown tracer provider");
    }

    result
}
