//! Graceful shutdown handling for looping commands.
//!
//! A watch-channel latch connects the signal handler to the command loop:
//! the producer latches it once, the loop reads it non-blockingly at
//! iteration boundaries.

use tokio::sync::watch;
use tracing::{error, info};

use crate::telemetry::TracerProviderHandle;

/// Consumer half of the shutdown latch.
#[derive(Clone)]
pub struct ShutdownWatch {
    rx: watch::Receiver<bool>,
}

impl ShutdownWatch {
    /// Non-blocking check, read at loop iteration boundaries.
    pub fn is_shutting_down(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Producer half of the shutdown latch.
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Latches the shutdown state. Never blocks; repeated triggers are no-ops.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Creates the shutdown latch.
pub fn channel() -> (ShutdownTrigger, ShutdownWatch) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownWatch { rx })
}

/// Waits for a termination signal, latches the shutdown watch so a loop in
/// progress stops at its next boundary, then shuts the tracer provider down
/// and exits with status 0.
pub async fn handle_signals(trigger: ShutdownTrigger, telemetry: TracerProviderHandle) {
    wait_for_signal().await;

    info!("Received signal, shutting down tracer provider");
    trigger.trigger();
    if let Err(err) = telemetry.shutdown().await {
        error!(error = %err, "Failed to shutdown tracer provider");
    }
    std::process::exit(0);
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received Ctrl+C");
}
