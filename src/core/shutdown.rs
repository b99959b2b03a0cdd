//! Process shutdown signalling
//!
//! Turns OS signals (and an optional run deadline) into a single stop request
//! for the host. The pipeline's own stop protocol is synchronous and lives in
//! `pipeline::coordinator`; this module only decides *when* to run it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Why the host asked the pipeline to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT, SIGTERM, SIGHUP, SIGQUIT or Ctrl-C
    Signal,
    /// The configured run time elapsed
    Deadline,
}

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        (Self { shutdown_tx }, shutdown_rx)
    }

    #[cfg(test)]
    fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Install OS signal handlers feeding this coordinator
    ///
    /// Must be called from within a tokio runtime. A second signal forces
    /// immediate exit with status 130.
    pub fn install_signal_handlers(&self) {
        setup_signal_handlers(self.shutdown_tx.clone());
    }

    /// Wait until a stop is requested or `run_for` elapses, whichever is first
    pub async fn wait_for_stop(
        shutdown_rx: &mut broadcast::Receiver<()>,
        run_for: Option<Duration>,
    ) -> StopReason {
        match run_for {
            Some(limit) => {
                tokio::select! {
                    _ = shutdown_rx.recv() => StopReason::Signal,
                    _ = tokio::time::sleep(limit) => StopReason::Deadline,
                }
            }
            None => {
                let _ = shutdown_rx.recv().await;
                StopReason::Signal
            }
        }
    }
}

fn record_signal(tx: &broadcast::Sender<()>, signal_count: &AtomicUsize) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    let _ = tx.send(());
    if prev >= 1 {
        log::warn!("Second stop signal received; exiting immediately");
        std::process::exit(130);
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        record_signal(&tx, &sig_ctr);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                record_signal(&shutdown_tx, &signal_count);
            }
        });
    }
}
