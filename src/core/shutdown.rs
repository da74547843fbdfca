use tokio::signal;

/// Resolves once the process receives Ctrl+C or, on Unix, SIGTERM.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                wait_for_ctrl_c().await;
                announce();
                return;
            }
        };

        tokio::select! {
            _ = wait_for_ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    announce();
}

async fn wait_for_ctrl_c() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

fn announce() {
    tracing::info!("Shutdown signal received, draining connections");
}
