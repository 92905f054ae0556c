//! Serving with a bounded shutdown drain

use anyhow::Result;
use axum::Router;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

/// Serve `app` until `signal` resolves, then drain in-flight requests
///
/// Connections still open `grace` after the signal are dropped.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, mut fired_rx) = watch::channel(false);

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                let _ = fired_tx.send(true);
            })
            .await
    });
    let abort = server.abort_handle();

    let drain_limit = async move {
        if fired_rx.changed().await.is_ok() {
            info!("Draining connections for up to {:?}", grace);
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        joined = server => joined??,
        _ = drain_limit => {
            warn!("Connections still open after {:?}, forcing shutdown", grace);
            abort.abort();
        }
    }

    Ok(())
}
