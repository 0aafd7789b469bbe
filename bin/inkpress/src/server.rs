//! Static file server for local previews

use std::path::Path;

use axum::Router;
use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Create the development server router.
///
/// Directory URLs resolve to their `index.html`; unknown paths get the
/// site's `404.html` with a 404 status.
pub fn create_router(output_dir: &Path) -> Router {
    let files = ServeDir::new(output_dir)
        .not_found_service(ServeFile::new(output_dir.join("404.html")));

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Serve `output_dir` on `127.0.0.1:<port>` until Ctrl+C.
pub async fn serve(output_dir: &Path, port: u16, open_browser: bool) -> Result<()> {
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser && let Err(e) = open::that(format!("http://{addr}")) {
        tracing::warn!(error = %e, "Failed to open browser");
    }

    axum::serve(listener, create_router(output_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Dev server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
}
