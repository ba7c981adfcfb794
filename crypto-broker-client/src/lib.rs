//! Client library for the Crypto Broker gRPC service.
//!
//! The entry point is [`Library`], which owns a channel to the broker and
//! exposes one method per broker operation. Connecting is retried on a fixed
//! cadence so callers can start before the broker finishes coming up; see
//! [`RetryPolicy`] for the knobs.
//!
//! The broker endpoint is taken from the `CRYPTO_BROKER_ENDPOINT` environment
//! variable and falls back to `http://localhost:50051`.
//!
//! ```no_run
//! use crypto_broker_client::{Library, RetryPolicy};
//! use crypto_broker_client::proto::HashRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), crypto_broker_client::ClientError> {
//! let library = Library::connect_with_retry(RetryPolicy::default()).await?;
//! let response = library
//!     .hash(HashRequest {
//!         input: b"input bytes".to_vec(),
//!         profile: "Default".to_string(),
//!         metadata: None,
//!     })
//!     .await?;
//! println!("{}", response.hash_value);
//! library.close();
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

mod client;
pub mod proto;
mod retry;

pub use client::CryptoBrokerClient;
pub use retry::RetryPolicy;

/// Environment variable naming the broker endpoint.
pub const CRYPTO_BROKER_ENDPOINT: &str = "CRYPTO_BROKER_ENDPOINT";
/// Endpoint used when `CRYPTO_BROKER_ENDPOINT` is unset or empty.
pub const CRYPTO_BROKER_ENDPOINT_DEFAULT: &str = "http://localhost:50051";

/// Errors surfaced by the broker client.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// The configured broker endpoint is not a valid URI.
    #[error("invalid broker endpoint {0}. Reason {1}")]
    InvalidEndpoint(String, String),

    /// Establishing the transport connection failed.
    #[error("transport failure: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// A single connection attempt did not complete within its time budget.
    #[error("connection attempt timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Every connection attempt permitted by the retry policy failed.
    #[error("broker unreachable after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The failure of the final attempt.
        source: Box<ClientError>,
    },

    /// The broker rejected or failed a call.
    #[error("broker call failed: {0}")]
    Call(#[from] tonic::Status),
}

/// Connected handle to the Crypto Broker.
///
/// Methods take `&self`; the underlying channel multiplexes calls, so a
/// single `Library` can serve a whole command loop.
#[derive(Debug)]
pub struct Library {
    client: CryptoBrokerClient,
    target: String,
}

impl Library {
    /// Connects to the broker with the default [`RetryPolicy`].
    pub async fn connect() -> Result<Self, ClientError> {
        Self::connect_with_retry(RetryPolicy::default()).await
    }

    /// Connects to the broker, retrying per `policy` until the channel is
    /// established or the attempt budget runs out.
    ///
    /// The endpoint is resolved from `CRYPTO_BROKER_ENDPOINT` once up front;
    /// a malformed endpoint fails immediately without consuming attempts.
    pub async fn connect_with_retry(policy: RetryPolicy) -> Result<Self, ClientError> {
        let target = endpoint_from_env();
        let endpoint = parse_target(&target, policy.per_attempt_timeout)?;

        debug!(endpoint = %target, "connecting to crypto broker");
        let channel = retry::retry_with_fixed_delay(policy, "broker_connect", || {
            let endpoint = endpoint.clone();
            async move { endpoint.connect().await.map_err(ClientError::from) }
        })
        .await?;

        Ok(Self {
            client: CryptoBrokerClient::new(channel),
            target,
        })
    }

    /// Hashes the request input under the requested profile.
    pub async fn hash(&self, request: proto::HashRequest) -> Result<proto::HashResponse, ClientError> {
        let mut client = self.client.clone();
        let response = client.hash(request).await?;
        Ok(response.into_inner())
    }

    /// Signs a certificate signing request with the supplied CA material.
    pub async fn sign(&self, request: proto::SignRequest) -> Result<proto::SignResponse, ClientError> {
        let mut client = self.client.clone();
        let response = client.sign(request).await?;
        Ok(response.into_inner())
    }

    /// Reports broker liveness and build version.
    pub async fn health(
        &self,
        request: proto::HealthRequest,
    ) -> Result<proto::HealthResponse, ClientError> {
        let mut client = self.client.clone();
        let response = client.health(request).await?;
        Ok(response.into_inner())
    }

    /// Runs the broker's server-side benchmark suite.
    pub async fn benchmark(
        &self,
        request: proto::BenchmarkRequest,
    ) -> Result<proto::BenchmarkResponse, ClientError> {
        let mut client = self.client.clone();
        let response = client.benchmark(request).await?;
        Ok(response.into_inner())
    }

    /// Calls the broker's diagnostic echo endpoint.
    pub async fn fake_endpoint(
        &self,
        request: proto::FakeEndpointRequest,
    ) -> Result<proto::FakeEndpointResponse, ClientError> {
        let mut client = self.client.clone();
        let response = client.fake_endpoint(request).await?;
        Ok(response.into_inner())
    }

    /// Releases the broker connection.
    ///
    /// Dropping the handle releases it as well; `close` marks the point at
    /// which the caller is done with the broker.
    pub fn close(self) {
        debug!(endpoint = %self.target, "closing crypto broker connection");
    }
}

fn endpoint_from_env() -> String {
    std::env::var(CRYPTO_BROKER_ENDPOINT)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| CRYPTO_BROKER_ENDPOINT_DEFAULT.to_string())
}

fn parse_target(target: &str, connect_timeout: Duration) -> Result<Endpoint, ClientError> {
    let endpoint = Channel::from_shared(target.to_string())
        .map_err(|e| ClientError::InvalidEndpoint(target.to_string(), e.to_string()))?;
    Ok(endpoint.connect_timeout(connect_timeout))
}
