//! Message types for the `cryptobroker.v1.CryptoBroker` service.
//!
//! These definitions mirror the broker's protobuf schema and are kept in the
//! generated style so a regeneration from the `.proto` files stays a trivial
//! diff. Response types (and the envelope types they embed) additionally
//! implement [`serde::Serialize`] with camelCase keys, which is the rendering
//! the CLI prints for operators.

/// Correlation envelope attached to every request.
///
/// A fresh envelope carries a unique id and its creation time; the
/// trace-context sub-message is filled in by the caller from the span that
/// wraps the request.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Globally unique request id (UUID string).
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// Creation time of the envelope, RFC 3339 in UTC.
    #[prost(string, tag = "2")]
    pub created_at: ::prost::alloc::string::String,
    /// Trace-correlation identifiers of the span that issued the request.
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub trace_context: ::core::option::Option<TraceContext>,
}
/// W3C trace-correlation identifiers in their canonical string forms.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceContext {
    /// 32 lowercase hex characters.
    #[prost(string, tag = "1")]
    pub trace_id: ::prost::alloc::string::String,
    /// 16 lowercase hex characters.
    #[prost(string, tag = "2")]
    pub span_id: ::prost::alloc::string::String,
    /// 2 lowercase hex characters.
    #[prost(string, tag = "3")]
    pub trace_flags: ::prost::alloc::string::String,
    /// The `tracestate` header value; may be empty.
    #[prost(string, tag = "4")]
    pub trace_state: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashRequest {
    /// Raw bytes to be hashed by the broker.
    #[prost(bytes = "vec", tag = "1")]
    pub input: ::prost::alloc::vec::Vec<u8>,
    /// Broker profile selecting the hash parameters.
    #[prost(string, tag = "2")]
    pub profile: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashResponse {
    /// Encoded digest of the request input.
    #[prost(string, tag = "1")]
    pub hash_value: ::prost::alloc::string::String,
    /// Algorithm the broker selected for the requested profile.
    #[prost(string, tag = "2")]
    pub hash_algorithm: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignRequest {
    /// Certificate signing request, raw file contents.
    #[prost(bytes = "vec", tag = "1")]
    pub csr: ::prost::alloc::vec::Vec<u8>,
    /// CA certificate used for signing, raw file contents.
    #[prost(bytes = "vec", tag = "2")]
    pub ca_cert: ::prost::alloc::vec::Vec<u8>,
    /// CA private key used for signing, raw file contents.
    #[prost(bytes = "vec", tag = "3")]
    pub ca_private_key: ::prost::alloc::vec::Vec<u8>,
    /// Broker profile selecting the signing parameters.
    #[prost(string, tag = "4")]
    pub profile: ::prost::alloc::string::String,
    /// Optional subject override for the issued certificate.
    #[prost(string, optional, tag = "5")]
    pub subject: ::core::option::Option<::prost::alloc::string::String>,
    /// Encoding of the returned certificate.
    #[prost(enumeration = "CertificateEncoding", tag = "6")]
    pub encoding: i32,
    #[prost(message, optional, tag = "7")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    /// The signed certificate in the requested encoding.
    #[prost(string, tag = "1")]
    pub signed_certificate: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthRequest {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Broker liveness state, e.g. "SERVING".
    #[prost(string, tag = "1")]
    pub status: ::prost::alloc::string::String,
    /// Broker build version.
    #[prost(string, tag = "2")]
    pub version: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BenchmarkRequest {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResponse {
    /// One entry per benchmarked primitive.
    #[prost(message, repeated, tag = "1")]
    pub results: ::prost::alloc::vec::Vec<BenchmarkResult>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    /// Name of the benchmarked primitive.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Number of iterations executed server-side.
    #[prost(uint64, tag = "2")]
    pub iterations: u64,
    /// Mean duration of one iteration in microseconds.
    #[prost(double, tag = "3")]
    pub average_duration_us: f64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FakeEndpointRequest {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<Metadata>,
}
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeEndpointResponse {
    /// Free-form echo from the broker's diagnostic endpoint.
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub metadata: ::core::option::Option<Metadata>,
}
/// Encoding of certificates returned by `Sign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CertificateEncoding {
    /// PEM-armored text. Default.
    Pem = 0,
    /// Standalone base64 of the DER bytes.
    B64 = 1,
}
impl CertificateEncoding {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            CertificateEncoding::Pem => "CERTIFICATE_ENCODING_PEM",
            CertificateEncoding::B64 => "CERTIFICATE_ENCODING_B64",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "CERTIFICATE_ENCODING_PEM" => Some(Self::Pem),
            "CERTIFICATE_ENCODING_B64" => Some(Self::B64),
            _ => None,
        }
    }
}
