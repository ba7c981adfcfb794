use thiserror::Error;

use crypto_broker_client::ClientError;

use crate::telemetry::TelemetryError;

/// Errors that abort a command.
#[derive(Error, Debug)]
pub enum Error {
    /// Telemetry could not be configured.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// A command input file could not be read.
    #[error("could not read {role} file {path}, err: {source}")]
    File {
        /// What the file is for, e.g. "certificate signing request".
        role: &'static str,
        /// Path as given on the command line.
        path: String,
        source: std::io::Error,
    },

    /// The broker could not be reached or failed a call.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A broker response could not be rendered as JSON.
    #[error("could not render response, err: {0}")]
    Render(#[from] serde_json::Error),
}
