use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    AppState,
    config::AppConfig,
    error::{Error, Result},
    routes, storage,
};

/// Run the web form server until Ctrl-C
pub async fn serve(config: AppConfig) -> Result<()> {
    storage::ensure_dir(&config.storage.download_dir).await?;

    let address = config.server.bind_address();
    let form = config.server.form;
    let ctx = Arc::new(AppState::new(config)?);
    let app = routes::app(ctx);

    let listener = TcpListener::bind(address.as_str())
        .await
        .map_err(|e| Error::Config(format!("failed to bind {address}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| Error::Config(format!("failed to read bound address: {e}")))?;

    info!("Server is running on {} ({:?} form)", local, form);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Network(format!("server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
