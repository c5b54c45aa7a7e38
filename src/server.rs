//! HTTP server lifecycle: serve until a shutdown signal, then drain with a deadline.

use axum::Router;
use std::{
    future::{Future, IntoFuture},
    time::Duration,
};
use tokio::{net::TcpListener, sync::watch};

/// Serves `app` until SIGINT or SIGTERM, then gives in-flight requests `grace` to finish.
pub async fn serve(listener: TcpListener, app: Router, grace: Duration) -> std::io::Result<()> {
    serve_with_shutdown(listener, app, grace, shutdown_signal()).await
}

/// Same as [`serve`] with a caller-supplied shutdown trigger.
///
/// When `signal` resolves the listener stops accepting connections. If the open requests
/// have not completed after `grace`, the server future is dropped, which aborts them.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    signal: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let (triggered_tx, mut triggered_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!(grace_secs = grace.as_secs(), "shutdown signal received, draining");
            let _ = triggered_tx.send(true);
        })
        .into_future();

    let deadline = async move {
        if triggered_rx.wait_for(|triggered| *triggered).await.is_err() {
            // Sender gone without a signal: the server already stopped on its own.
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            tracing::info!("server stopped");
            result
        }
        _ = deadline => {
            tracing::warn!("grace period elapsed, aborting in-flight requests");
            Ok(())
        }
    }
}

/// Resolves on the first of Ctrl+C / SIGINT or SIGTERM.
///
/// If a handler cannot be installed, that branch just never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
