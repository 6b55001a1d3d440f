use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

use board_api::AppState;
use board_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board=debug,board_api=debug,board_db=info,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path: PathBuf = std::env::var("BOARD_DB_PATH")
        .unwrap_or_else(|_| "app.db".into())
        .into();
    let host = std::env::var("BOARD_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("BOARD_PORT")
        .unwrap_or_else(|_| "5555".into())
        .parse()?;

    let db = Database::open(&db_path)?;
    let app = board_api::router(AppState::new(db));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Message board listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
