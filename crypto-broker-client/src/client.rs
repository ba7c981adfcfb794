//! Thin gRPC client for the `cryptobroker.v1.CryptoBroker` service.
//!
//! Hand-maintained mirror of what `tonic-build` would generate for the
//! service definition, kept concrete over [`tonic::transport::Channel`].

use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::transport::Channel;
use tonic_prost::ProstCodec;

use crate::proto;

/// Client for the `cryptobroker.v1.CryptoBroker` service.
#[derive(Debug, Clone)]
pub struct CryptoBrokerClient {
    inner: Grpc<Channel>,
}

impl CryptoBrokerClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    /// Hashes the request input under the requested profile.
    pub async fn hash(
        &mut self,
        request: impl tonic::IntoRequest<proto::HashRequest>,
    ) -> Result<tonic::Response<proto::HashResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<proto::HashRequest, proto::HashResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/cryptobroker.v1.CryptoBroker/Hash");
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Signs a certificate signing request with the supplied CA material.
    pub async fn sign(
        &mut self,
        request: impl tonic::IntoRequest<proto::SignRequest>,
    ) -> Result<tonic::Response<proto::SignResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<proto::SignRequest, proto::SignResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/cryptobroker.v1.CryptoBroker/Sign");
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Reports broker liveness and build version.
    pub async fn health(
        &mut self,
        request: impl tonic::IntoRequest<proto::HealthRequest>,
    ) -> Result<tonic::Response<proto::HealthResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<proto::HealthRequest, proto::HealthResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/cryptobroker.v1.CryptoBroker/Health");
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Runs the broker's server-side benchmark suite.
    pub async fn benchmark(
        &mut self,
        request: impl tonic::IntoRequest<proto::BenchmarkRequest>,
    ) -> Result<tonic::Response<proto::BenchmarkResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<proto::BenchmarkRequest, proto::BenchmarkResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static("/cryptobroker.v1.CryptoBroker/Benchmark");
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Calls the broker's diagnostic echo endpoint.
    pub async fn fake_endpoint(
        &mut self,
        request: impl tonic::IntoRequest<proto::FakeEndpointRequest>,
    ) -> Result<tonic::Response<proto::FakeEndpointResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<proto::FakeEndpointRequest, proto::FakeEndpointResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static("/cryptobroker.v1.CryptoBroker/FakeEndpoint");
        self.inner.unary(request.into_request(), path, codec).await
    }
}
