//! `sign` command: sends a certificate signing request to the crypto
//! broker and displays the signed certificate.

use std::fs;
use std::time::Instant;

use crypto_broker_client::{proto, Library, RetryPolicy};
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::SdkTracer;
use tracing::{debug, info};

use crate::error::Error;
use crate::runner::{self, LoopSpec};
use crate::telemetry::attrs;
use crate::telemetry::SpanScope;

/// Certificate encodings accepted by `--encoding`.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Encoding {
    /// PEM-armored certificate
    Pem,
    /// Standalone base64 of the certificate bytes
    B64,
}

impl Encoding {
    fn to_proto(self) -> proto::CertificateEncoding {
        match self {
            Encoding::Pem => proto::CertificateEncoding::Pem,
            Encoding::B64 => proto::CertificateEncoding::B64,
        }
    }
}

pub async fn execute(
    csr: String,
    ca_cert: String,
    ca_key: String,
    profile: String,
    encoding: Encoding,
    subject: Option<String>,
    delay_ms: i64,
) -> Result<(), Error> {
    super::with_telemetry(|telemetry, watch| async move {
        // All inputs are read up front so a bad path fails before any
        // connection attempt. Loop iterations reuse the same payload.
        let base = proto::SignRequest {
            csr: read_input_file("certificate signing request", &csr)?,
            ca_cert: read_input_file("CA Certificate", &ca_cert)?,
            ca_private_key: read_input_file("signing key", &ca_key)?,
            profile,
            subject: subject.filter(|subject| !subject.is_empty()),
            encoding: encoding.to_proto() as i32,
            metadata: None,
        };

        let library = Library::connect_with_retry(RetryPolicy::default()).await?;
        let tracer = telemetry.tracer(super::SERVICE_NAME);

        let result = runner::run(LoopSpec::from_flag(delay_ms), &watch, || {
            sign_once(&library, &tracer, base.clone())
        })
        .await;

        info!("Closing crypto broker library connection");
        library.close();

        result
    })
    .await
}

async fn sign_once(
    library: &Library,
    tracer: &SdkTracer,
    mut request: proto::SignRequest,
) -> Result<(), Error> {
    let mut scope = SpanScope::open(
        tracer,
        "CLI.Sign",
        vec![
            KeyValue::new(attrs::RPC_METHOD, "Sign"),
            KeyValue::new(attrs::CRYPTO_PROFILE, request.profile.clone()),
            KeyValue::new(attrs::CRYPTO_CSR_SIZE, request.csr.len() as i64),
            KeyValue::new(attrs::CRYPTO_CA_CERT_SIZE, request.ca_cert.len() as i64),
            KeyValue::new(
                attrs::CRYPTO_CA_KEY_SIZE,
                request.ca_private_key.len() as i64,
            ),
        ],
    );
    request.metadata = Some(scope.inject(request.metadata.take()));

    let started = Instant::now();
    let response = match library.sign(request).await {
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
        attrs::CRYPTO_SIGNED_CERT_SIZE,
        response.signed_certificate.len() as i64,
    )]);
    scope.succeed();
    debug!("Certificate signing completed successfully");

    info!("Sign Response:\n{rendered}");
    info!(
        elapsed_us = elapsed.as_micros(),
        "Certificate signing finished"
    );

    Ok(())
}

fn read_input_file(role: &'static str, path: &str) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::File {
        role,
        path: path.to_string(),
        source,
    })
}
