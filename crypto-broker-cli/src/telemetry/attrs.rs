//! Span attribute keys for broker operations.

pub use opentelemetry_semantic_conventions::attribute::RPC_METHOD;

/// Broker profile the operation ran under.
pub const CRYPTO_PROFILE: &str = "crypto.profile";
/// Size in bytes of the input handed to `hash`.
pub const CRYPTO_INPUT_SIZE: &str = "crypto.input_size";
/// Algorithm the broker selected for a `hash` call.
pub const CRYPTO_HASH_ALGORITHM: &str = "crypto.hash_algorithm";
/// Size in bytes of the returned digest.
pub const CRYPTO_HASH_OUTPUT_SIZE: &str = "crypto.hash_output_size";
/// Size in bytes of the certificate signing request sent to `sign`.
pub const CRYPTO_CSR_SIZE: &str = "crypto.csr_size";
/// Size in bytes of the CA certificate sent to `sign`.
pub const CRYPTO_CA_CERT_SIZE: &str = "crypto.ca_cert_size";
/// Size in bytes of the CA signing key sent to `sign`.
pub const CRYPTO_CA_KEY_SIZE: &str = "crypto.ca_key_size";
/// Size in bytes of the signed certificate returned by `sign`.
pub const CRYPTO_SIGNED_CERT_SIZE: &str = "crypto.signed_cert_size";
/// Size in bytes of the rendered benchmark report.
pub const CRYPTO_BENCHMARK_RESULTS_SIZE: &str = "crypto.benchmark_results_size";
