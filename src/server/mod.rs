//! Server module
//!
//! Listener construction, the accept loop, per-connection serving, and
//! signal-driven shutdown. The server has exactly two states: unstarted
//! and running; there is no runtime reconfiguration.

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;
use connection::accept_connection;
use signal::SignalHandler;

/// Accept connections until a shutdown signal arrives
///
/// Runs inside a `LocalSet`; each accepted connection is served on a
/// `spawn_local` task. On shutdown the listener is dropped so no new
/// connections are accepted, then the loop waits for in-flight connections
/// to finish, bounded by the configured connection timeout.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        // A signal can land between select iterations, while no waiter is
        // registered on the Notify; the flag catches that case.
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    logger::log_shutdown();
    drop(listener);
    drain_connections(&active_connections, &state).await;
    Ok(())
}

/// Wait for in-flight connections to finish
///
/// Bounded by the connection timeout: every connection task is wrapped in
/// that timeout, so anything still active afterwards is already gone.
async fn drain_connections(active: &AtomicUsize, state: &AppState) {
    let grace = Duration::from_secs(std::cmp::max(
        state.config.performance.read_timeout,
        state.config.performance.write_timeout,
    ));
    let deadline = Instant::now() + grace;
    while active.load(Ordering::SeqCst) > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_run_returns_when_signal_precedes_waiting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let state = Arc::new(AppState::new(Config::load_from("does-not-exist").unwrap()));
        let signals = Arc::new(SignalHandler::new());

        // Simulate a signal delivered before the accept loop registers a
        // waiter: notify_waiters alone would be lost, the flag must not be.
        signals.shutdown_requested.store(true, Ordering::SeqCst);
        signals.shutdown.notify_waiters();

        run(listener, state, signals).await.unwrap();
    }

    #[tokio::test]
    async fn test_drain_returns_when_no_connections_active() {
        let state = AppState::new(Config::load_from("does-not-exist").unwrap());
        let active = AtomicUsize::new(0);
        let started = Instant::now();
        drain_connections(&active, &state).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
